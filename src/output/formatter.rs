use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::leads::ScoredLead;
use crate::pipeline::SourceReport;
use crate::scoring::PriorityTier;

const RULE_WIDTH: usize = 70;

/// Number of leads shown in the console summary
pub const TOP_LEADS: usize = 5;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn rule(c: char) -> String {
    c.to_string().repeat(RULE_WIDTH)
}

/// Title framed by double rules
pub fn format_banner(title: &str, use_colors: bool) -> String {
    let title = if use_colors {
        title.bold().to_string()
    } else {
        title.to_string()
    };
    format!("{}\n{}\n{}", rule('='), title, rule('='))
}

/// "STAGE 2: funded companies" followed by a single rule
pub fn format_stage_heading(stage: usize, name: &str, use_colors: bool) -> String {
    let heading = format!("STAGE {}: {}", stage, name);
    if use_colors {
        format!("{}\n{}", heading.bold(), rule('-').dimmed())
    } else {
        format!("{}\n{}", heading, rule('-'))
    }
}

/// One-line outcome of a source run
pub fn format_stage_result(report: &SourceReport, use_colors: bool) -> String {
    if report.is_clean() {
        let line = format!("  ok: {} leads from {}", report.lead_count, report.name);
        if use_colors {
            line.green().to_string()
        } else {
            line
        }
    } else {
        let line = format!(
            "  partial: {} leads from {}, {} request(s) failed",
            report.lead_count,
            report.name,
            report.errors.len()
        );
        if use_colors {
            line.yellow().to_string()
        } else {
            line
        }
    }
}

/// Score on the nominal 100-point scale, e.g. "95/100"
pub fn format_score(score: u32) -> String {
    format!("{}/100", score)
}

/// Signal breakdown as "Role=30, Funding=20, ..."
pub fn format_signals(lead: &ScoredLead) -> String {
    lead.signals
        .iter()
        .map(|(signal, points)| format!("{}={}", signal.label(), points))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Multi-line entry for one ranked lead. The role line is cut to `max_width`
/// when given.
pub fn format_lead_detail(
    rank: usize,
    lead: &ScoredLead,
    max_width: Option<usize>,
    use_colors: bool,
) -> String {
    let record = &lead.lead;
    let role = format!("{} at {}", record.title, record.company);
    let role = match max_width {
        Some(width) if width > 20 => truncate(&role, width - 3),
        _ => role,
    };

    if use_colors {
        format!(
            "{}. {} (Score: {})\n   {}\n   Location: {}\n   Email: {}\n   Signals: {}",
            rank,
            record.name.bold(),
            format_score(lead.score).cyan(),
            role,
            record.location,
            record.contact_identifier.underline(),
            format_signals(lead).dimmed()
        )
    } else {
        format!(
            "{}. {} (Score: {})\n   {}\n   Location: {}\n   Email: {}\n   Signals: {}",
            rank,
            record.name,
            format_score(lead.score),
            role,
            record.location,
            record.contact_identifier,
            format_signals(lead)
        )
    }
}

/// The highest ranked leads, separated by blank lines
pub fn format_top_leads(leads: &[ScoredLead], count: usize, use_colors: bool) -> String {
    if leads.is_empty() {
        return "No leads to display.".to_string();
    }

    let width = get_terminal_width();
    leads
        .iter()
        .take(count)
        .enumerate()
        .map(|(idx, lead)| format_lead_detail(idx + 1, lead, width, use_colors))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Lead counts per priority tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl TierCounts {
    pub fn from_leads(leads: &[ScoredLead]) -> Self {
        let mut counts = Self::default();
        for lead in leads {
            match lead.tier() {
                PriorityTier::High => counts.high += 1,
                PriorityTier::Medium => counts.medium += 1,
                PriorityTier::Low => counts.low += 1,
            }
        }
        counts
    }

    pub fn get(&self, tier: PriorityTier) -> usize {
        match tier {
            PriorityTier::High => self.high,
            PriorityTier::Medium => self.medium,
            PriorityTier::Low => self.low,
        }
    }
}

/// Total plus one line per tier, e.g. "  High priority (>=85): 4"
pub fn format_tier_summary(leads: &[ScoredLead], use_colors: bool) -> String {
    let counts = TierCounts::from_leads(leads);
    let mut lines = vec![format!("  Total leads: {}", leads.len())];

    for tier in PriorityTier::ALL {
        let line = format!(
            "  {} priority ({}): {}",
            tier,
            tier.range_label(),
            counts.get(tier)
        );
        let line = match (use_colors, tier) {
            (true, PriorityTier::High) => line.green().to_string(),
            (true, PriorityTier::Medium) => line.yellow().to_string(),
            _ => line,
        };
        lines.push(line);
    }

    lines.join("\n")
}
