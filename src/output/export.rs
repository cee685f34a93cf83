use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::leads::ScoredLead;
use crate::scoring::Signal;

pub const CSV_HEADER: [&str; 16] = [
    "Rank",
    "Probability_Score",
    "Name",
    "Title",
    "Company",
    "Location",
    "HQ",
    "Email",
    "LinkedIn",
    "Recent_Activity",
    "Funding_Status",
    "Signal_Role_Fit",
    "Signal_Funding",
    "Signal_Tech",
    "Signal_Location",
    "Signal_Publication",
];

/// One CSV row. Field order must match `CSV_HEADER`.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    rank: usize,
    score: u32,
    name: &'a str,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    headquarters: &'a str,
    email: &'a str,
    linkedin: &'a str,
    recent_activity: &'a str,
    funding_status: &'a str,
    role_fit: u32,
    funding: u32,
    tech: u32,
    hub_location: u32,
    publication: u32,
}

impl<'a> ExportRow<'a> {
    fn new(rank: usize, scored: &'a ScoredLead) -> Self {
        let lead = &scored.lead;
        Self {
            rank,
            score: scored.score,
            name: &lead.name,
            title: &lead.title,
            company: &lead.company,
            location: &lead.location,
            headquarters: &lead.headquarters,
            email: &lead.contact_identifier,
            linkedin: &lead.linkedin,
            recent_activity: &lead.recent_activity_note,
            funding_status: &lead.funding_status,
            role_fit: scored.signals.get(Signal::RoleFit),
            funding: scored.signals.get(Signal::Funding),
            tech: scored.signals.get(Signal::Tech),
            hub_location: scored.signals.get(Signal::Location),
            publication: scored.signals.get(Signal::Publication),
        }
    }
}

/// Timestamped export name, e.g. "leads_3d_invitro_20241018_142501.csv"
pub fn default_filename<Tz: TimeZone>(now: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("leads_3d_invitro_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Default export path inside `directory`, stamped with the local time
pub fn default_export_path(directory: &Path) -> PathBuf {
    directory.join(default_filename(chrono::Local::now()))
}

/// Write ranked leads as CSV. Rows are numbered from 1 in slice order.
///
/// The file is replaced atomically, so a failed export never leaves a
/// half-written file behind.
pub fn write_csv(path: &Path, leads: &[ScoredLead]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory at {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut file);

        writer
            .write_record(CSV_HEADER)
            .context("Failed to write CSV header")?;
        for (idx, lead) in leads.iter().enumerate() {
            writer
                .serialize(ExportRow::new(idx + 1, lead))
                .with_context(|| format!("Failed to write CSV row {}", idx + 1))?;
        }
        writer.flush().context("Failed to flush CSV output")?;
    }

    // Commit the write atomically
    file.commit()
        .with_context(|| format!("Failed to save export to {}", path.display()))?;

    Ok(())
}
