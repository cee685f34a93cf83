use std::collections::HashSet;

use crate::leads::ScoredLead;
use crate::scoring::score_lead;
use crate::sources::{LeadSource, SourceError};

/// What one source contributed to a run.
#[derive(Debug)]
pub struct SourceReport {
    pub name: String,
    pub lead_count: usize,
    pub errors: Vec<SourceError>, // Recovered failures, already logged
}

impl SourceReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Progress notifications emitted while sources run.
#[derive(Debug)]
pub enum StageEvent<'a> {
    Started { stage: usize, name: &'a str },
    Finished { stage: usize, report: &'a SourceReport },
}

/// Scored leads in source order, before dedupe and ranking.
#[derive(Debug, Default)]
pub struct Collected {
    pub leads: Vec<ScoredLead>,
    pub reports: Vec<SourceReport>,
}

/// Final result of a pipeline run.
#[derive(Debug)]
pub struct RunOutcome {
    pub ranked: Vec<ScoredLead>, // Deduplicated, score descending
    pub collected: usize,        // Lead count before dedupe
    pub reports: Vec<SourceReport>,
}

/// Run every source in order, scoring each lead as it arrives.
///
/// Sources run one after another. A source that fails only lowers its own
/// lead count; later sources still run.
pub async fn collect<F>(sources: &[Box<dyn LeadSource>], mut on_event: F) -> Collected
where
    F: FnMut(StageEvent<'_>),
{
    let mut collected = Collected::default();

    for (i, source) in sources.iter().enumerate() {
        let stage = i + 1;
        on_event(StageEvent::Started {
            stage,
            name: source.name(),
        });

        let outcome = source.collect().await;
        let report = SourceReport {
            name: source.name().to_string(),
            lead_count: outcome.leads.len(),
            errors: outcome.errors,
        };
        collected
            .leads
            .extend(outcome.leads.into_iter().map(score_lead));

        on_event(StageEvent::Finished {
            stage,
            report: &report,
        });
        collected.reports.push(report);
    }

    collected
}

/// Keep the first lead seen for each contact identifier, preserving order.
pub fn dedupe(leads: Vec<ScoredLead>) -> Vec<ScoredLead> {
    let mut seen = HashSet::new();
    leads
        .into_iter()
        .filter(|lead| seen.insert(lead.contact_identifier().to_string()))
        .collect()
}

/// Sort by score descending. Stable: equal scores keep collection order.
pub fn rank(mut leads: Vec<ScoredLead>) -> Vec<ScoredLead> {
    leads.sort_by(|a, b| b.score.cmp(&a.score));
    leads
}

/// Collect, dedupe and rank.
pub async fn run<F>(sources: &[Box<dyn LeadSource>], on_event: F) -> RunOutcome
where
    F: FnMut(StageEvent<'_>),
{
    let collected = collect(sources, on_event).await;
    let total = collected.leads.len();

    RunOutcome {
        ranked: rank(dedupe(collected.leads)),
        collected: total,
        reports: collected.reports,
    }
}
