use std::fmt;

/// Title terms that mark a role as relevant to in-vitro toxicology work.
pub const ROLE_KEYWORDS: &[&str] = &[
    "toxicology",
    "safety",
    "hepatic",
    "3d",
    "preclinical",
    "in vitro",
    "dili",
];

/// Seniority terms worth the full role-fit weight. Checked before `SENIOR_TERMS`.
pub const LEADERSHIP_TERMS: &[&str] = &["director", "head", "vp"];

pub const SENIOR_TERMS: &[&str] = &["principal", "senior"];

/// Locations with a high concentration of biotech buyers.
pub const HUB_LOCATIONS: &[&str] = &[
    "cambridge",
    "boston",
    "bay area",
    "san francisco",
    "basel",
    "oxford",
    "uk golden triangle",
];

pub const ROLE_LEADERSHIP_POINTS: u32 = 30;
pub const ROLE_SENIOR_POINTS: u32 = 25;
pub const ROLE_BASE_POINTS: u32 = 20;
pub const FUNDING_LATE_STAGE_POINTS: u32 = 20;
pub const FUNDING_SERIES_A_POINTS: u32 = 15;
pub const TECH_POINTS: u32 = 15;
pub const LOCATION_POINTS: u32 = 10;
pub const RECENT_PUBLICATION_POINTS: u32 = 40;
pub const ANY_PUBLICATION_POINTS: u32 = 20;

/// Highest score the model can produce. Above the nominal 100 scale on purpose:
/// totals are reported unclamped.
pub const MAX_SCORE: u32 = ROLE_LEADERSHIP_POINTS
    + FUNDING_LATE_STAGE_POINTS
    + TECH_POINTS
    + LOCATION_POINTS
    + RECENT_PUBLICATION_POINTS;

/// A weighted component of the lead score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    RoleFit,
    Funding,
    Tech,
    Location,
    Publication,
}

impl Signal {
    /// Canonical evaluation and export order
    pub const ALL: [Signal; 5] = [
        Signal::RoleFit,
        Signal::Funding,
        Signal::Tech,
        Signal::Location,
        Signal::Publication,
    ];

    /// Stable snake_case key, e.g. "role_fit"
    pub fn key(self) -> &'static str {
        match self {
            Signal::RoleFit => "role_fit",
            Signal::Funding => "funding",
            Signal::Tech => "tech",
            Signal::Location => "location",
            Signal::Publication => "publication",
        }
    }

    /// Short label used in console output
    pub fn label(self) -> &'static str {
        match self {
            Signal::RoleFit => "Role",
            Signal::Funding => "Funding",
            Signal::Tech => "Tech",
            Signal::Location => "Location",
            Signal::Publication => "Publication",
        }
    }

    /// Points this signal can contribute at most
    pub fn max_points(self) -> u32 {
        match self {
            Signal::RoleFit => ROLE_LEADERSHIP_POINTS,
            Signal::Funding => FUNDING_LATE_STAGE_POINTS,
            Signal::Tech => TECH_POINTS,
            Signal::Location => LOCATION_POINTS,
            Signal::Publication => RECENT_PUBLICATION_POINTS,
        }
    }

    fn index(self) -> usize {
        match self {
            Signal::RoleFit => 0,
            Signal::Funding => 1,
            Signal::Tech => 2,
            Signal::Location => 3,
            Signal::Publication => 4,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Points contributed by each signal. Every signal always has an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalBreakdown {
    points: [u32; 5],
}

impl SignalBreakdown {
    pub fn set(&mut self, signal: Signal, points: u32) {
        self.points[signal.index()] = points;
    }

    pub fn get(&self, signal: Signal) -> u32 {
        self.points[signal.index()]
    }

    /// (signal, points) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Signal, u32)> + '_ {
        Signal::ALL.iter().map(move |&s| (s, self.get(s)))
    }

    pub fn total(&self) -> u32 {
        self.points.iter().sum()
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Role fit: 30 for leadership, 25 for senior/principal, 20 otherwise, but
/// only when the title mentions a relevant discipline.
pub fn role_fit_points(title: &str) -> u32 {
    let title = title.to_lowercase();
    if !contains_any(&title, ROLE_KEYWORDS) {
        return 0;
    }
    if contains_any(&title, LEADERSHIP_TERMS) {
        ROLE_LEADERSHIP_POINTS
    } else if contains_any(&title, SENIOR_TERMS) {
        ROLE_SENIOR_POINTS
    } else {
        ROLE_BASE_POINTS
    }
}

/// Funding intent: late-stage rounds beat Series A; anything else is zero.
pub fn funding_points(funding_status: &str) -> u32 {
    let funding = funding_status.to_lowercase();
    if funding.contains("series b") || funding.contains("series c") {
        FUNDING_LATE_STAGE_POINTS
    } else if funding.contains("series a") {
        FUNDING_SERIES_A_POINTS
    } else {
        0
    }
}

pub fn tech_points(uses_relevant_technology: bool) -> u32 {
    if uses_relevant_technology {
        TECH_POINTS
    } else {
        0
    }
}

/// Location hub fit: either the contact's location or the employer HQ counts.
pub fn location_points(location: &str, headquarters: &str) -> u32 {
    let location = location.to_lowercase();
    let headquarters = headquarters.to_lowercase();
    let in_hub = HUB_LOCATIONS
        .iter()
        .any(|hub| location.contains(hub) || headquarters.contains(hub));
    if in_hub {
        LOCATION_POINTS
    } else {
        0
    }
}

/// Scientific intent: a recent paper outranks any older publication record.
pub fn publication_points(has_recent_publication: bool, has_any_publication: bool) -> u32 {
    if has_recent_publication {
        RECENT_PUBLICATION_POINTS
    } else if has_any_publication {
        ANY_PUBLICATION_POINTS
    } else {
        0
    }
}
