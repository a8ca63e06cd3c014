use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use super::clock::Clock;
use crate::error::{LifecycleError, Result};
use crate::models::{CompetitionRecord, CompetitionStatus};
use crate::repository::CompetitionStore;

/// The single write path for competition status.
///
/// Callers are expected to have validated (and, for manual changes, confirmed)
/// the transition already. The executor only guards against lost updates.
/// Re-applying the status a record already holds returns the record as stored.
#[derive(Clone)]
pub struct TransitionExecutor {
    store: Arc<dyn CompetitionStore>,
    clock: Arc<dyn Clock>,
}

impl TransitionExecutor {
    pub fn new(store: Arc<dyn CompetitionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub async fn execute(
        &self,
        id: Uuid,
        new_status: CompetitionStatus,
        expected_updated_at: DateTime<Utc>,
    ) -> Result<CompetitionRecord> {
        let current = self.store.find_by_id(id).await?;

        // A replayed write finds its own result in place, whatever the token.
        if current.status == new_status {
            debug!(competition_id = %id, status = %new_status, "Status already applied");
            return Ok(current);
        }

        if current.updated_at != expected_updated_at {
            return Err(LifecycleError::Conflict {
                expected: expected_updated_at,
                actual: current.updated_at,
            });
        }

        // The token has to move forward on every write, even under a frozen clock.
        let updated_at = self
            .clock
            .now()
            .max(expected_updated_at + Duration::microseconds(1));

        let record = match self
            .store
            .update_status(id, expected_updated_at, new_status, updated_at)
            .await
        {
            Ok(record) => record,
            Err(err) if err.is_conflict() => {
                let winner = self.store.find_by_id(id).await?;
                if winner.status != new_status {
                    return Err(err);
                }
                debug!(
                    competition_id = %id,
                    status = %new_status,
                    "Concurrent writer applied the same status"
                );
                return Ok(winner);
            }
            Err(err) => return Err(err),
        };

        info!(
            competition_id = %id,
            from = %current.status,
            to = %new_status,
            "Competition status changed"
        );

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryCompetitionStore;
    use crate::services::clock::ManualClock;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn setup(
        status: CompetitionStatus,
    ) -> (TransitionExecutor, Arc<ManualClock>, CompetitionRecord) {
        let mut record = CompetitionRecord::draft(Uuid::new_v4(), start());
        record.status = status;
        let store = Arc::new(InMemoryCompetitionStore::with_records([record.clone()]));
        let clock = Arc::new(ManualClock::new(start() + Duration::hours(1)));

        (TransitionExecutor::new(store, clock.clone()), clock, record)
    }

    #[tokio::test]
    async fn test_execute_writes_status_and_token() {
        let (executor, clock, record) = setup(CompetitionStatus::Published);

        let updated = executor
            .execute(record.id, CompetitionStatus::Nomination, record.updated_at)
            .await
            .unwrap();

        assert_eq!(updated.status, CompetitionStatus::Nomination);
        assert_eq!(updated.updated_at, clock.now());
    }

    #[tokio::test]
    async fn test_stale_token_conflicts() {
        let (executor, _, record) = setup(CompetitionStatus::Published);

        executor
            .execute(record.id, CompetitionStatus::Nomination, record.updated_at)
            .await
            .unwrap();

        let err = executor
            .execute(record.id, CompetitionStatus::Voting, record.updated_at)
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_repeated_noop_succeeds() {
        let (executor, _, record) = setup(CompetitionStatus::Voting);

        for _ in 0..2 {
            let same = executor
                .execute(record.id, CompetitionStatus::Voting, record.updated_at)
                .await
                .unwrap();
            assert_eq!(same, record);
        }
    }

    #[tokio::test]
    async fn test_same_status_twice_with_fresh_token() {
        let (executor, _, record) = setup(CompetitionStatus::Published);

        let first = executor
            .execute(record.id, CompetitionStatus::Nomination, record.updated_at)
            .await
            .unwrap();
        let second = executor
            .execute(record.id, CompetitionStatus::Nomination, first.updated_at)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_frozen_clock_still_moves_token() {
        let (executor, clock, record) = setup(CompetitionStatus::Published);
        clock.set(record.updated_at);

        let updated = executor
            .execute(record.id, CompetitionStatus::Nomination, record.updated_at)
            .await
            .unwrap();
        assert!(updated.updated_at > record.updated_at);
    }

    #[tokio::test]
    async fn test_concurrent_writers_with_same_token() {
        let (executor, _, record) = setup(CompetitionStatus::Published);
        let other = executor.clone();

        let (first, second) = tokio::join!(
            executor.execute(record.id, CompetitionStatus::Nomination, record.updated_at),
            other.execute(record.id, CompetitionStatus::Archived, record.updated_at),
        );

        let outcomes = [first, second];
        let succeeded = outcomes.iter().filter(|r| r.is_ok()).count();
        let conflicted = outcomes
            .iter()
            .filter(|r| matches!(r, Err(e) if e.is_conflict()))
            .count();
        assert_eq!((succeeded, conflicted), (1, 1));
    }

    #[tokio::test]
    async fn test_concurrent_writers_agreeing_on_status_both_succeed() {
        let (executor, _, record) = setup(CompetitionStatus::Published);
        let other = executor.clone();

        let (first, second) = tokio::join!(
            executor.execute(record.id, CompetitionStatus::Nomination, record.updated_at),
            other.execute(record.id, CompetitionStatus::Nomination, record.updated_at),
        );

        let (first, second) = (first.unwrap(), second.unwrap());
        assert_eq!(first, second);
        assert_eq!(first.status, CompetitionStatus::Nomination);
    }

    #[tokio::test]
    async fn test_replayed_request_returns_applied_record() {
        let (executor, _, record) = setup(CompetitionStatus::Published);

        let first = executor
            .execute(record.id, CompetitionStatus::Nomination, record.updated_at)
            .await
            .unwrap();
        let replay = executor
            .execute(record.id, CompetitionStatus::Nomination, record.updated_at)
            .await
            .unwrap();

        assert_eq!(replay, first);
        assert!(replay.updated_at > record.updated_at);
    }

    #[tokio::test]
    async fn test_missing_record() {
        let (executor, _, _) = setup(CompetitionStatus::Draft);

        let err = executor
            .execute(Uuid::new_v4(), CompetitionStatus::Published, start())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
