use serde::Serialize;
use utoipa::ToSchema;

use crate::models::CompetitionRecord;

/// Which publish requirements a competition currently satisfies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct RequirementReport {
    pub city: bool,
    pub category: bool,
    pub demographic: bool,
    pub host: bool,
    pub nomination_start: bool,
    pub finals_date: bool,
}

impl RequirementReport {
    /// The four references every published competition must carry.
    pub fn is_publishable(&self) -> bool {
        self.city && self.category && self.demographic && self.host
    }

    /// Missing references. Each of these blocks publishing.
    pub fn blockers(&self) -> Vec<String> {
        [
            (self.city, "City must be assigned"),
            (self.category, "Category must be assigned"),
            (self.demographic, "Demographic must be assigned"),
            (self.host, "Host must be assigned"),
        ]
        .into_iter()
        .filter(|(met, _)| !met)
        .map(|(_, message)| message.to_string())
        .collect()
    }

    /// Missing timeline dates. Publishing is still allowed, but the
    /// corresponding automatic transitions will never fire.
    pub fn advisories(&self) -> Vec<String> {
        [
            (
                self.nomination_start,
                "Nomination start date is not set; the nomination phase will not open automatically",
            ),
            (
                self.finals_date,
                "Finals date is not set; the competition will not complete automatically",
            ),
        ]
        .into_iter()
        .filter(|(met, _)| !met)
        .map(|(_, message)| message.to_string())
        .collect()
    }
}

pub fn check_publish_readiness(record: &CompetitionRecord) -> RequirementReport {
    RequirementReport {
        city: record.city_id.is_some(),
        category: record.category_id.is_some(),
        demographic: record.demographic_id.is_some(),
        host: record.host_id.is_some(),
        nomination_start: record.nomination_start.is_some(),
        finals_date: record.finals_date.is_some(),
    }
}
