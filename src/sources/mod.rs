//! Lead sources: anything that can produce raw `LeadRecord`s.
//!
//! Sources never abort a run. Each one returns whatever leads it managed to
//! build plus the errors it recovered from, and the pipeline reports both.

pub mod conference;
pub mod contact;
pub mod funded;
pub mod literature;

use anyhow::Result;
use async_trait::async_trait;
use std::fmt;

use crate::config::Config;
use crate::leads::LeadRecord;

pub use conference::{Attendee, ConferenceSource};
pub use funded::{Contact, FundedCompany, FundedCompanySource};
pub use literature::{LiteratureSource, PubMedClient};

/// Common interface for every lead source.
#[async_trait]
pub trait LeadSource: Send + Sync {
    /// Human-readable name used in progress output
    fn name(&self) -> &str;

    async fn collect(&self) -> SourceOutcome;
}

/// Leads produced by one source run, plus failures it recovered from.
#[derive(Debug, Default)]
pub struct SourceOutcome {
    pub leads: Vec<LeadRecord>,
    pub errors: Vec<SourceError>,
}

impl SourceOutcome {
    pub fn from_leads(leads: Vec<LeadRecord>) -> Self {
        Self {
            leads,
            errors: Vec::new(),
        }
    }
}

/// Build the configured sources in run order: literature, funded companies,
/// conference attendees. `include_literature = false` skips the network source.
pub fn from_config(
    config: &Config,
    include_literature: bool,
) -> Result<Vec<Box<dyn LeadSource>>> {
    let mut sources: Vec<Box<dyn LeadSource>> = Vec::new();

    if include_literature && config.literature.enabled {
        sources.push(Box::new(LiteratureSource::new(&config.literature)?));
    }

    let funded = match &config.datasets.companies {
        Some(path) => FundedCompanySource::from_file(path)?,
        None => FundedCompanySource::sample(),
    };
    sources.push(Box::new(funded));

    let conference = match &config.datasets.attendees {
        Some(path) => ConferenceSource::from_file(config.conference.name.clone(), path)?,
        None => ConferenceSource::sample(config.conference.name.clone()),
    };
    sources.push(Box::new(conference));

    Ok(sources)
}

#[derive(Debug)]
pub enum SourceError {
    /// Transport-level failure (connect, timeout, TLS)
    Http { context: String, message: String },
    /// Remote answered with a non-success status
    Status { context: String, status: u16 },
    /// Body could not be decoded into the expected shape
    Decode { context: String, message: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Http { context, message } => {
                write!(f, "{}: request failed: {}", context, message)
            }
            SourceError::Status { context, status } => {
                write!(f, "{}: unexpected HTTP status {}", context, status)
            }
            SourceError::Decode { context, message } => {
                write!(f, "{}: invalid response body: {}", context, message)
            }
        }
    }
}

impl SourceError {
    /// Whether another attempt could succeed. Client errors other than 429
    /// and undecodable bodies fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Http { .. } => true,
            SourceError::Status { status, .. } => *status == 429 || *status >= 500,
            SourceError::Decode { .. } => false,
        }
    }
}

impl std::error::Error for SourceError {}
