use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use super::clock::Clock;
use super::executor::TransitionExecutor;
use super::reconciliation::{Reconciler, ReconcilerConfig};
use super::transition::{ValidationResult, requires_confirmation, validate_transition};
use crate::dto::competition::CompetitionView;
use crate::error::{LifecycleError, Result};
use crate::models::{CompetitionRecord, CompetitionStatus};
use crate::repository::CompetitionStore;

/// A validated, not yet executed, status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct TransitionProposal {
    pub competition_id: Uuid,
    pub from: CompetitionStatus,
    pub to: CompetitionStatus,
    pub expected_updated_at: DateTime<Utc>,
    pub validation: ValidationResult,
    pub requires_confirmation: bool,
}

impl TransitionProposal {
    pub fn for_record(record: &CompetitionRecord, to: CompetitionStatus) -> Self {
        Self {
            competition_id: record.id,
            from: record.status,
            to,
            expected_updated_at: record.updated_at,
            validation: validate_transition(record, to),
            requires_confirmation: requires_confirmation(record.status, to),
        }
    }

    /// The operator accepted the proposal, warnings included.
    pub fn confirm(self) -> Result<ApprovedTransition> {
        if !self.validation.valid {
            return Err(LifecycleError::Validation(self.validation.errors));
        }

        Ok(ApprovedTransition {
            competition_id: self.competition_id,
            to: self.to,
            expected_updated_at: self.expected_updated_at,
        })
    }

    /// Approve without operator involvement. Only allowed when the change
    /// does not need confirmation.
    pub fn approve(self) -> Result<ApprovedTransition> {
        if self.validation.valid && self.requires_confirmation {
            return Err(LifecycleError::ConfirmationRequired {
                from: self.from,
                to: self.to,
            });
        }

        self.confirm()
    }
}

/// A transition that passed validation and the confirmation gate.
///
/// Only obtainable through [`TransitionProposal::confirm`] or
/// [`TransitionProposal::approve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedTransition {
    competition_id: Uuid,
    to: CompetitionStatus,
    expected_updated_at: DateTime<Utc>,
}

/// Propose, confirm and execute status changes, and read competitions with
/// their computed phase.
#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn CompetitionStore>,
    clock: Arc<dyn Clock>,
    executor: TransitionExecutor,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn CompetitionStore>, clock: Arc<dyn Clock>) -> Self {
        let executor = TransitionExecutor::new(store.clone(), clock.clone());
        Self {
            store,
            clock,
            executor,
        }
    }

    pub fn reconciler(&self, config: ReconcilerConfig) -> Reconciler {
        Reconciler::new(self.store.clone(), self.clock.clone(), config)
    }

    /// Get a competition with its phase and drift status
    pub async fn view(&self, id: Uuid) -> Result<CompetitionView> {
        let record = self.store.find_by_id(id).await?;
        Ok(CompetitionView::at(record, self.clock.now()))
    }

    /// List competitions with their phase and drift status, plus the total count
    pub async fn list(&self, offset: u32, limit: u32) -> Result<(Vec<CompetitionView>, i64)> {
        let now = self.clock.now();
        let records = self.store.list(offset, limit).await?;
        let total = self.store.count().await?;

        let views = records
            .into_iter()
            .map(|record| CompetitionView::at(record, now))
            .collect();

        Ok((views, total))
    }

    /// Validate a status change against the current record
    pub async fn propose(&self, id: Uuid, to: CompetitionStatus) -> Result<TransitionProposal> {
        let record = self.store.find_by_id(id).await?;
        Ok(TransitionProposal::for_record(&record, to))
    }

    /// Confirmation gate. Re-validates against fresh state and writes nothing.
    pub async fn confirm(&self, id: Uuid, to: CompetitionStatus) -> Result<()> {
        let proposal = self.propose(id, to).await?;
        proposal.validation.log_warnings();
        proposal.confirm()?;

        info!(competition_id = %id, to = %to, "Status change confirmed by operator");
        Ok(())
    }

    pub async fn execute(&self, approved: ApprovedTransition) -> Result<CompetitionRecord> {
        self.executor
            .execute(
                approved.competition_id,
                approved.to,
                approved.expected_updated_at,
            )
            .await
    }

    /// Stateless propose/confirm/execute for callers that hold no proposal,
    /// such as HTTP clients.
    pub async fn execute_manual(
        &self,
        id: Uuid,
        to: CompetitionStatus,
        expected_updated_at: DateTime<Utc>,
        confirmed: bool,
    ) -> Result<CompetitionRecord> {
        let record = self.store.find_by_id(id).await?;
        if record.updated_at != expected_updated_at && record.status != to {
            return Err(LifecycleError::Conflict {
                expected: expected_updated_at,
                actual: record.updated_at,
            });
        }

        let proposal = TransitionProposal::for_record(&record, to);
        proposal.validation.log_warnings();

        let approved = if confirmed {
            proposal.confirm()?
        } else {
            proposal.approve()?
        };

        self.execute(approved).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Phase;
    use crate::repository::InMemoryCompetitionStore;
    use crate::services::clock::ManualClock;
    use chrono::{Duration, TimeZone};

    fn at(m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, m, d, 0, 0, 0).unwrap()
    }

    fn publishable() -> CompetitionRecord {
        let mut record = CompetitionRecord::draft(Uuid::new_v4(), at(1, 1));
        record.city_id = Some(Uuid::new_v4());
        record.category_id = Some(Uuid::new_v4());
        record.demographic_id = Some(Uuid::new_v4());
        record.host_id = Some(Uuid::new_v4());
        record.nomination_start = Some(at(2, 1));
        record.finals_date = Some(at(4, 1));
        record
    }

    fn service(
        records: Vec<CompetitionRecord>,
    ) -> (LifecycleService, Arc<InMemoryCompetitionStore>) {
        let store = Arc::new(InMemoryCompetitionStore::with_records(records));
        let clock = Arc::new(ManualClock::new(at(1, 15)));
        (LifecycleService::new(store.clone(), clock), store)
    }

    #[tokio::test]
    async fn test_publish_without_confirmation() {
        let record = publishable();
        let (service, _) = service(vec![record.clone()]);

        let proposal = service
            .propose(record.id, CompetitionStatus::Published)
            .await
            .unwrap();
        assert!(proposal.validation.valid);
        assert!(!proposal.requires_confirmation);

        let updated = service.execute(proposal.approve().unwrap()).await.unwrap();
        assert_eq!(updated.status, CompetitionStatus::Published);
    }

    #[tokio::test]
    async fn test_archive_needs_confirmation() {
        let mut record = publishable();
        record.status = CompetitionStatus::Completed;
        let (service, store) = service(vec![record.clone()]);

        let proposal = service
            .propose(record.id, CompetitionStatus::Archived)
            .await
            .unwrap();
        assert!(proposal.requires_confirmation);

        let err = proposal.clone().approve().unwrap_err();
        assert!(matches!(err, LifecycleError::ConfirmationRequired { .. }));
        // Declining leaves the record untouched.
        assert_eq!(store.find_by_id(record.id).await.unwrap(), record);

        service
            .confirm(record.id, CompetitionStatus::Archived)
            .await
            .unwrap();
        assert_eq!(store.find_by_id(record.id).await.unwrap(), record);

        let updated = service.execute(proposal.confirm().unwrap()).await.unwrap();
        assert_eq!(updated.status, CompetitionStatus::Archived);
    }

    #[tokio::test]
    async fn test_invalid_proposal_cannot_be_confirmed() {
        let mut record = publishable();
        record.status = CompetitionStatus::Archived;
        let (service, _) = service(vec![record.clone()]);

        let err = service
            .confirm(record.id, CompetitionStatus::Voting)
            .await
            .unwrap_err();
        match err {
            LifecycleError::Validation(errors) => assert_eq!(
                errors,
                vec!["Archived competitions can only be moved back to Draft".to_string()]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_execute_manual_paths() {
        let mut record = publishable();
        record.status = CompetitionStatus::Voting;
        let (service, _) = service(vec![record.clone()]);

        let err = service
            .execute_manual(record.id, CompetitionStatus::Draft, record.updated_at, false)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::ConfirmationRequired { .. }));

        let err = service
            .execute_manual(
                record.id,
                CompetitionStatus::Draft,
                record.updated_at - Duration::seconds(5),
                true,
            )
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let updated = service
            .execute_manual(record.id, CompetitionStatus::Draft, record.updated_at, true)
            .await
            .unwrap();
        assert_eq!(updated.status, CompetitionStatus::Draft);

        let replayed = service
            .execute_manual(record.id, CompetitionStatus::Draft, record.updated_at, true)
            .await
            .unwrap();
        assert_eq!(replayed, updated);
    }

    #[tokio::test]
    async fn test_stale_proposal_conflicts() {
        let record = publishable();
        let (service, _) = service(vec![record.clone()]);

        let first = service
            .propose(record.id, CompetitionStatus::Published)
            .await
            .unwrap();
        let second = service
            .propose(record.id, CompetitionStatus::Archived)
            .await
            .unwrap();

        service.execute(first.approve().unwrap()).await.unwrap();
        let err = service
            .execute(second.confirm().unwrap())
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_view_and_list() {
        let mut record = publishable();
        record.status = CompetitionStatus::Published;
        record.nomination_start = Some(at(1, 10));
        let (service, _) = service(vec![record.clone(), publishable()]);

        let view = service.view(record.id).await.unwrap();
        assert_eq!(view.phase, Phase::Nomination);
        assert!(view.drift.needs_update);

        let (views, total) = service.list(0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(views.len(), 2);
    }
}
