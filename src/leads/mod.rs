pub mod types;

pub use types::{LeadRecord, ScoredLead};
