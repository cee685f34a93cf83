use std::fmt;

/// Outreach priority derived from a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PriorityTier {
    High,   // >= 85
    Medium, // 70-84
    Low,    // < 70
}

pub const HIGH_PRIORITY_THRESHOLD: u32 = 85;
pub const MEDIUM_PRIORITY_THRESHOLD: u32 = 70;

impl PriorityTier {
    pub const ALL: [PriorityTier; 3] = [
        PriorityTier::High,
        PriorityTier::Medium,
        PriorityTier::Low,
    ];

    pub fn for_score(score: u32) -> Self {
        if score >= HIGH_PRIORITY_THRESHOLD {
            PriorityTier::High
        } else if score >= MEDIUM_PRIORITY_THRESHOLD {
            PriorityTier::Medium
        } else {
            PriorityTier::Low
        }
    }

    /// Score range description, e.g. "70-84"
    pub fn range_label(self) -> &'static str {
        match self {
            PriorityTier::High => ">=85",
            PriorityTier::Medium => "70-84",
            PriorityTier::Low => "<70",
        }
    }
}

impl fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PriorityTier::High => "High",
            PriorityTier::Medium => "Medium",
            PriorityTier::Low => "Low",
        };
        f.write_str(name)
    }
}
