use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use super::readiness::check_publish_readiness;
use crate::models::{CompetitionRecord, CompetitionStatus};

/// Outcome of validating a proposed status change.
///
/// Errors block the change. Warnings are surfaced to the operator but do not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

pub fn validate_transition(
    record: &CompetitionRecord,
    new_status: CompetitionStatus,
) -> ValidationResult {
    let current = record.status;
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if new_status == current {
        return ValidationResult::from_parts(errors, warnings);
    }

    if new_status == CompetitionStatus::Published {
        let readiness = check_publish_readiness(record);
        errors.extend(readiness.blockers());
        warnings.extend(readiness.advisories());
    }

    if current == CompetitionStatus::Completed && new_status != CompetitionStatus::Archived {
        warnings.push("Reopening a completed competition may affect historical data".to_string());
    }

    if current == CompetitionStatus::Archived && new_status != CompetitionStatus::Draft {
        errors.push("Archived competitions can only be moved back to Draft".to_string());
    }

    if let (Some(from), Some(to)) = (current.sequence_index(), new_status.sequence_index())
        && to < from
    {
        warnings.push(format!(
            "Unusual backward move from {} to {}",
            current, new_status
        ));
    }

    ValidationResult::from_parts(errors, warnings)
}

/// Whether an operator must explicitly confirm a manual change before it is
/// executed. Archiving, completing, and leaving the live voting state all do.
pub fn requires_confirmation(current: CompetitionStatus, new_status: CompetitionStatus) -> bool {
    if current == new_status {
        return false;
    }

    matches!(
        new_status,
        CompetitionStatus::Archived | CompetitionStatus::Completed
    ) || current.is_live()
}

/// Whether the reconciliation loop may apply this change on its own.
///
/// Only forward moves out of a timeline-driven status qualify. Automatic
/// transitions skip confirmation entirely.
pub fn is_automatic(current: CompetitionStatus, new_status: CompetitionStatus) -> bool {
    if !current.is_auto_tracked() || new_status == CompetitionStatus::Archived {
        return false;
    }

    match (current.sequence_index(), new_status.sequence_index()) {
        (Some(from), Some(to)) => to > from,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn record(status: CompetitionStatus) -> CompetitionRecord {
        let mut record = CompetitionRecord::draft(Uuid::new_v4(), Utc::now());
        record.status = status;
        record
    }

    fn publishable(status: CompetitionStatus) -> CompetitionRecord {
        let mut record = record(status);
        record.city_id = Some(Uuid::new_v4());
        record.category_id = Some(Uuid::new_v4());
        record.demographic_id = Some(Uuid::new_v4());
        record.host_id = Some(Uuid::new_v4());
        record
    }

    #[test]
    fn test_publish_requires_city() {
        let result =
            validate_transition(&record(CompetitionStatus::Draft), CompetitionStatus::Published);

        assert!(!result.valid);
        assert!(result.errors.contains(&"City must be assigned".to_string()));
    }

    #[test]
    fn test_publish_missing_host_always_blocks() {
        for status in CompetitionStatus::ALL {
            if *status == CompetitionStatus::Published {
                continue;
            }
            let mut record = publishable(*status);
            record.host_id = None;

            let result = validate_transition(&record, CompetitionStatus::Published);
            assert!(!result.valid, "{status} -> publish should be blocked");
            assert!(!result.errors.is_empty());
        }
    }

    #[test]
    fn test_publish_missing_dates_only_warns() {
        let result = validate_transition(
            &publishable(CompetitionStatus::Draft),
            CompetitionStatus::Published,
        );

        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_archive_completed_needs_confirmation_without_warnings() {
        let record = record(CompetitionStatus::Completed);
        let result = validate_transition(&record, CompetitionStatus::Archived);

        assert!(result.valid);
        assert!(result.warnings.is_empty());
        assert!(requires_confirmation(record.status, CompetitionStatus::Archived));
    }

    #[test]
    fn test_voting_back_to_draft_warns_and_needs_confirmation() {
        let record = record(CompetitionStatus::Voting);
        let result = validate_transition(&record, CompetitionStatus::Draft);

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("backward move"));
        assert!(requires_confirmation(record.status, CompetitionStatus::Draft));
    }

    #[test]
    fn test_archived_only_returns_to_draft() {
        let record = record(CompetitionStatus::Archived);

        let result = validate_transition(&record, CompetitionStatus::Voting);
        assert!(!result.valid);
        assert!(
            result
                .errors
                .contains(&"Archived competitions can only be moved back to Draft".to_string())
        );

        for target in CompetitionStatus::ALL {
            let result = validate_transition(&record, *target);
            let expected = matches!(target, CompetitionStatus::Draft | CompetitionStatus::Archived);
            assert_eq!(result.valid, expected, "archive -> {target}");
        }
    }

    #[test]
    fn test_reopening_completed_warns() {
        let result =
            validate_transition(&record(CompetitionStatus::Completed), CompetitionStatus::Judging);

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].starts_with("Reopening a completed competition"));
    }

    #[test]
    fn test_noop_is_always_clean() {
        for status in CompetitionStatus::ALL {
            let record = record(*status);
            let result = validate_transition(&record, *status);
            assert!(result.valid);
            assert!(result.errors.is_empty());
            assert!(result.warnings.is_empty());
            assert!(!requires_confirmation(*status, *status));
        }
    }

    #[test]
    fn test_forward_moves_are_clean() {
        let result =
            validate_transition(&record(CompetitionStatus::Nomination), CompetitionStatus::Voting);
        assert_eq!(result, ValidationResult::from_parts(vec![], vec![]));
        assert!(!requires_confirmation(CompetitionStatus::Nomination, CompetitionStatus::Voting));
    }

    #[test]
    fn test_confirmation_rules() {
        use CompetitionStatus::*;

        assert!(requires_confirmation(Draft, Archived));
        assert!(requires_confirmation(Judging, Completed));
        assert!(requires_confirmation(Voting, Judging));
        assert!(!requires_confirmation(Draft, Published));
        assert!(!requires_confirmation(Archived, Draft));
        assert!(!requires_confirmation(Published, Nomination));
    }

    #[test]
    fn test_automatic_transitions() {
        use CompetitionStatus::*;

        assert!(is_automatic(Published, Nomination));
        assert!(is_automatic(Published, Judging));
        assert!(is_automatic(Voting, Judging));
        assert!(is_automatic(Judging, Completed));
        assert!(!is_automatic(Draft, Published));
        assert!(!is_automatic(Voting, Archived));
        assert!(!is_automatic(Voting, Nomination));
        assert!(!is_automatic(Completed, Archived));
    }
}
