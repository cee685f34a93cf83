use serde::{Deserialize, Serialize};

use crate::scoring::{PriorityTier, SignalBreakdown};

/// One prospective contact, as produced by a lead source.
///
/// Every field defaults to an empty string or `false`, so a record built from
/// partial data scores zero for the signals it has no input for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadRecord {
    pub name: String,
    pub title: String, // Free-text job title
    pub company: String,
    pub location: String, // Where the contact sits
    pub headquarters: String, // Employer HQ, may differ from location
    pub contact_identifier: String, // Synthetic email, dedupe key
    pub linkedin: String, // "linkedin.com/in/<handle>"
    pub funding_status: String, // e.g. "Series B funded, $120M"
    pub uses_relevant_technology: bool,
    pub has_recent_publication: bool,
    pub has_any_publication: bool,
    pub recent_activity_note: String, // Provenance, e.g. "Attended SOT 2024"
}

/// A lead together with its score and per-signal breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredLead {
    pub lead: LeadRecord,
    pub score: u32,
    pub signals: SignalBreakdown,
}

impl ScoredLead {
    pub fn tier(&self) -> PriorityTier {
        PriorityTier::for_score(self.score)
    }

    /// Dedupe key of the underlying record
    pub fn contact_identifier(&self) -> &str {
        &self.lead.contact_identifier
    }
}
