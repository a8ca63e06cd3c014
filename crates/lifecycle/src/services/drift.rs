use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::phase::compute_phase;
use crate::models::{CompetitionRecord, CompetitionStatus, Phase};

/// Whether a record's persisted status lags behind its timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct DriftReport {
    pub needs_update: bool,
    pub current_status: CompetitionStatus,
    pub computed_phase: Phase,
}

impl DriftReport {
    /// The status the record should be synced to, if it has drifted.
    pub fn target_status(&self) -> Option<CompetitionStatus> {
        self.needs_update.then(|| self.computed_phase.as_status())
    }
}

/// Manual states are authoritative and never drift.
pub fn detect_drift(record: &CompetitionRecord, now: DateTime<Utc>) -> DriftReport {
    let computed_phase = compute_phase(record, now);
    let needs_update =
        !record.status.is_manual_only() && computed_phase.as_status() != record.status;

    DriftReport {
        needs_update,
        current_status: record.status,
        computed_phase,
    }
}
