use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::contact::{company_domain, display_name, email_address, linkedin_handle};
use super::{LeadSource, SourceOutcome};
use crate::leads::LeadRecord;

const FUNDING_NOTE: &str = "Established company";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Attendee {
    pub name: String,
    pub title: String,
    pub company: String,
    pub location: String,
}

/// Attendee list of a single conference. Stand-in for a registration export.
#[derive(Debug, Clone)]
pub struct ConferenceSource {
    conference: String,
    attendees: Vec<Attendee>,
}

impl ConferenceSource {
    pub fn new(conference: impl Into<String>, attendees: Vec<Attendee>) -> Self {
        Self {
            conference: conference.into(),
            attendees,
        }
    }

    /// Load attendees from a YAML list of `Attendee` entries
    pub fn from_file(conference: impl Into<String>, path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read attendee dataset at {}", path.display()))?;
        let attendees: Vec<Attendee> = serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse attendee dataset in {}", path.display()))?;
        Ok(Self::new(conference, attendees))
    }

    /// Built-in demo attendee list
    pub fn sample(conference: impl Into<String>) -> Self {
        fn attendee(name: &str, title: &str, company: &str, location: &str) -> Attendee {
            Attendee {
                name: name.to_string(),
                title: title.to_string(),
                company: company.to_string(),
                location: location.to_string(),
            }
        }

        Self::new(
            conference,
            vec![
                attendee(
                    "Emily Rodriguez",
                    "VP of Hepatic Research",
                    "Gilead Sciences",
                    "Foster City, CA",
                ),
                attendee(
                    "David Patel",
                    "Head of Safety Pharmacology",
                    "AstraZeneca",
                    "Cambridge, UK",
                ),
                attendee(
                    "Michael Thompson",
                    "Senior Scientist, Drug Safety",
                    "BioNTech",
                    "Mainz, Germany",
                ),
                attendee(
                    "Robert Zhang",
                    "Principal Scientist, Toxicology",
                    "Genentech",
                    "South San Francisco, CA",
                ),
            ],
        )
    }

    pub fn conference(&self) -> &str {
        &self.conference
    }

    pub fn leads(&self) -> Vec<LeadRecord> {
        self.attendees
            .iter()
            .map(|attendee| LeadRecord {
                name: display_name(&attendee.name),
                title: attendee.title.clone(),
                company: attendee.company.clone(),
                location: attendee.location.clone(),
                headquarters: attendee.location.clone(),
                contact_identifier: email_address(
                    &attendee.name,
                    &company_domain(&attendee.company),
                ),
                linkedin: linkedin_handle(&attendee.name),
                funding_status: FUNDING_NOTE.to_string(),
                uses_relevant_technology: true,
                has_recent_publication: false,
                has_any_publication: true,
                recent_activity_note: format!("Attended {}", self.conference),
            })
            .collect()
    }
}

#[async_trait]
impl LeadSource for ConferenceSource {
    fn name(&self) -> &str {
        &self.conference
    }

    async fn collect(&self) -> SourceOutcome {
        SourceOutcome::from_leads(self.leads())
    }
}
