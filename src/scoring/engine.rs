use super::signals::{
    funding_points, location_points, publication_points, role_fit_points, tech_points, Signal,
    SignalBreakdown,
};
use crate::leads::types::{LeadRecord, ScoredLead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: u32, // Raw sum, not clamped to 100
    pub breakdown: SignalBreakdown,
}

/// Score a lead from its own fields. Pure: no I/O, no state, never fails.
pub fn calculate_score(lead: &LeadRecord) -> ScoreResult {
    let mut breakdown = SignalBreakdown::default();

    breakdown.set(Signal::RoleFit, role_fit_points(&lead.title));
    breakdown.set(Signal::Funding, funding_points(&lead.funding_status));
    breakdown.set(Signal::Tech, tech_points(lead.uses_relevant_technology));
    breakdown.set(
        Signal::Location,
        location_points(&lead.location, &lead.headquarters),
    );
    breakdown.set(
        Signal::Publication,
        publication_points(lead.has_recent_publication, lead.has_any_publication),
    );

    ScoreResult {
        score: breakdown.total(),
        breakdown,
    }
}

/// Score a lead and attach the result to it
pub fn score_lead(lead: LeadRecord) -> ScoredLead {
    let result = calculate_score(&lead);
    ScoredLead {
        lead,
        score: result.score,
        signals: result.breakdown,
    }
}
