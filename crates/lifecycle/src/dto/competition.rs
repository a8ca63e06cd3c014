use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{CompetitionRecord, CompetitionStatus, Phase};
use crate::services::drift::{DriftReport, detect_drift};
use crate::services::phase::compute_phase;

/// Request payload for proposing or confirming a status change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransitionRequest {
    pub status: CompetitionStatus,
}

/// Request payload for executing a status change
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExecuteTransitionRequest {
    pub status: CompetitionStatus,

    /// `updated_at` of the record the caller validated against
    #[serde(alias = "expectedUpdatedAt")]
    pub expected_updated_at: DateTime<Utc>,

    /// Whether the operator acknowledged the confirmation prompt
    #[serde(default)]
    pub confirmed: bool,
}

/// A competition together with what its timeline says right now
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompetitionView {
    pub record: CompetitionRecord,
    pub phase: Phase,
    pub drift: DriftReport,
}

impl CompetitionView {
    pub fn at(record: CompetitionRecord, now: DateTime<Utc>) -> Self {
        let phase = compute_phase(&record, now);
        let drift = detect_drift(&record, now);
        Self {
            record,
            phase,
            drift,
        }
    }
}
