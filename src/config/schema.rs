use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
pub const DEFAULT_CONFERENCE: &str = "SOT 2024";

/// Upper bound on ids per esummary request
pub const MAX_SUMMARY_IDS: usize = 20;

/// Top-level configuration. Every section is optional; an empty file is valid.
///
/// Example YAML:
/// ```yaml
/// literature:
///   queries:
///     - "hepatic spheroids toxicology"
///   max_results: 10
///   request_delay: 500ms
/// conference:
///   name: SOT 2025
/// datasets:
///   companies: ./data/companies.yaml
/// output:
///   directory: ./exports
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub literature: LiteratureConfig,
    pub conference: ConferenceConfig,
    pub datasets: DatasetConfig,
    pub output: OutputConfig,
}

/// Literature search (PubMed E-utilities) settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LiteratureConfig {
    /// Set to false to skip the network source entirely
    pub enabled: bool,

    /// E-utilities base URL, without trailing slash
    pub base_url: String,

    /// Free-text search terms, one search per entry
    pub queries: Vec<String>,

    /// `retmax` for each search
    pub max_results: usize,

    /// How many matched ids get a summary lookup (at most 20)
    pub summary_limit: usize,

    /// Pause between the search and summary calls, humantime format ("500ms")
    pub request_delay: String,

    /// Pause after each query, humantime format ("1s")
    pub query_pause: String,

    pub user_agent: String,
}

impl Default for LiteratureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            queries: vec![
                "drug-induced liver injury DILI 3D".to_string(),
                "hepatic spheroids toxicology".to_string(),
                "organ-on-chip liver safety".to_string(),
            ],
            max_results: 10,
            summary_limit: MAX_SUMMARY_IDS,
            request_delay: "500ms".to_string(),
            query_pause: "1s".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl LiteratureConfig {
    pub fn request_delay(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.request_delay)
    }

    pub fn query_pause(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(&self.query_pause)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConferenceConfig {
    /// Conference name used in the activity note, e.g. "Attended SOT 2024"
    pub name: String,
}

impl Default for ConferenceConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CONFERENCE.to_string(),
        }
    }
}

/// Optional YAML files replacing the built-in sample datasets.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    pub companies: Option<PathBuf>,
    pub attendees: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory the timestamped CSV is written to
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}
