//! Query predicates used by the in-memory store.
//!
//! Exact matches compare the whole value, case-sensitively. Substring
//! matches are case-insensitive containment tests.

use plantplan_db::models::PlantPlan;

/// One of the fixed query shapes a [`PlanStore`](crate::PlanStore) answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanFilter {
    /// `plantingSeason == season`
    PlantingSeason(String),
    /// `sunlightNeeds == sunlight`
    SunlightNeeds(String),
    /// `wateringFreq` contains the keyword, ignoring case. Absent values never match.
    WateringFreq(String),
    /// `name` contains the keyword, ignoring case.
    Name(String),
}

impl PlanFilter {
    pub fn matches(&self, plan: &PlantPlan) -> bool {
        match self {
            Self::PlantingSeason(season) => plan.planting_season == *season,
            Self::SunlightNeeds(sunlight) => plan.sunlight_needs == *sunlight,
            Self::WateringFreq(keyword) => plan
                .watering_freq
                .as_deref()
                .is_some_and(|value| contains_ignore_case(value, keyword)),
            Self::Name(keyword) => contains_ignore_case(&plan.name, keyword),
        }
    }
}

/// Case-insensitive substring test. The empty needle is contained in every
/// haystack.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
