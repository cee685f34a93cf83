pub mod engine;
pub mod signals;
pub mod tier;

pub use engine::{calculate_score, score_lead, ScoreResult};
pub use signals::{Signal, SignalBreakdown, MAX_SCORE};
pub use tier::PriorityTier;
