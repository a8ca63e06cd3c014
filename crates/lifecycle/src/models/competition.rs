use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::status::CompetitionStatus;

/// A competition as seen by the lifecycle engine.
///
/// Older clients send camelCase keys (and `finale_date` for the finals), so
/// those are accepted as aliases when deserializing. Serialization always
/// uses the snake_case names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CompetitionRecord {
    pub id: Uuid,
    #[serde(default)]
    pub status: CompetitionStatus,

    #[serde(default, alias = "nominationStart")]
    pub nomination_start: Option<DateTime<Utc>>,
    #[serde(default, alias = "nominationEnd")]
    pub nomination_end: Option<DateTime<Utc>>,
    #[serde(default, alias = "votingStart")]
    pub voting_start: Option<DateTime<Utc>>,
    #[serde(default, alias = "votingEnd")]
    pub voting_end: Option<DateTime<Utc>>,
    #[serde(default, alias = "finalsDate", alias = "finale_date")]
    pub finals_date: Option<DateTime<Utc>>,

    #[serde(default, alias = "cityId")]
    pub city_id: Option<Uuid>,
    #[serde(default, alias = "categoryId")]
    pub category_id: Option<Uuid>,
    #[serde(default, alias = "demographicId")]
    pub demographic_id: Option<Uuid>,
    #[serde(default, alias = "hostId")]
    pub host_id: Option<Uuid>,

    #[serde(default, alias = "minContestants")]
    pub min_contestants: Option<i32>,
    #[serde(default, alias = "maxContestants")]
    pub max_contestants: Option<i32>,

    #[serde(alias = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl CompetitionRecord {
    /// A bare draft with no timeline and no references assigned.
    pub fn draft(id: Uuid, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: CompetitionStatus::Draft,
            nomination_start: None,
            nomination_end: None,
            voting_start: None,
            voting_end: None,
            finals_date: None,
            city_id: None,
            category_id: None,
            demographic_id: None,
            host_id: None,
            min_contestants: None,
            max_contestants: None,
            updated_at,
        }
    }
}
