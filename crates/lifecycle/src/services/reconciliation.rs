use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use super::clock::Clock;
use super::drift::detect_drift;
use super::executor::TransitionExecutor;
use super::transition::is_automatic;
use crate::error::{LifecycleError, Result};
use crate::models::{CompetitionRecord, CompetitionStatus};
use crate::repository::CompetitionStore;

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub interval: Duration,
    pub max_concurrent: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
            max_concurrent: 8,
        }
    }
}

/// Counts from a single sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub scanned: usize,
    pub drifted: usize,
    pub applied: usize,
    pub conflicts: usize,
    pub failed: usize,
}

enum Outcome {
    Applied,
    Conflict,
    Failed,
}

/// Applies automatic transitions to records whose timeline has moved past
/// their persisted status.
pub struct Reconciler {
    store: Arc<dyn CompetitionStore>,
    clock: Arc<dyn Clock>,
    executor: TransitionExecutor,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(
        store: Arc<dyn CompetitionStore>,
        clock: Arc<dyn Clock>,
        config: ReconcilerConfig,
    ) -> Self {
        let executor = TransitionExecutor::new(store.clone(), clock.clone());
        Self {
            store,
            clock,
            executor,
            config,
        }
    }

    /// Run sweeps forever on the configured interval.
    pub async fn run(&self) {
        info!(
            interval_secs = self.config.interval.as_secs(),
            max_concurrent = self.config.max_concurrent,
            "Starting lifecycle reconciliation loop"
        );

        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            match self.sweep().await {
                Ok(report) if report.drifted > 0 => info!(
                    scanned = report.scanned,
                    applied = report.applied,
                    conflicts = report.conflicts,
                    failed = report.failed,
                    "Reconciliation sweep finished"
                ),
                Ok(report) => debug!(scanned = report.scanned, "No competitions out of sync"),
                Err(e) => error!(error = %e, "Reconciliation sweep failed"),
            }
        }
    }

    /// Scan every timeline-driven competition once.
    ///
    /// Conflicts are not retried here; the next sweep sees fresh state.
    pub async fn sweep(&self) -> Result<SweepReport> {
        let now = self.clock.now();
        let records = self
            .store
            .list_by_status(CompetitionStatus::AUTO_TRACKED)
            .await?;

        let mut report = SweepReport {
            scanned: records.len(),
            ..Default::default()
        };

        let pending: Vec<(CompetitionRecord, CompetitionStatus)> = records
            .into_iter()
            .filter_map(|record| {
                let target = detect_drift(&record, now).target_status()?;
                if is_automatic(record.status, target) {
                    Some((record, target))
                } else {
                    debug!(
                        competition_id = %record.id,
                        from = %record.status,
                        to = %target,
                        "Drift requires a manual transition, skipping"
                    );
                    None
                }
            })
            .collect();
        report.drifted = pending.len();

        let outcomes: Vec<Outcome> = stream::iter(pending)
            .map(|(record, target)| self.apply(record, target))
            .buffer_unordered(self.config.max_concurrent.max(1))
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                Outcome::Applied => report.applied += 1,
                Outcome::Conflict => report.conflicts += 1,
                Outcome::Failed => report.failed += 1,
            }
        }

        Ok(report)
    }

    async fn apply(&self, record: CompetitionRecord, target: CompetitionStatus) -> Outcome {
        match self
            .executor
            .execute(record.id, target, record.updated_at)
            .await
        {
            Ok(_) => Outcome::Applied,
            Err(LifecycleError::Conflict { .. }) | Err(LifecycleError::NotFound) => {
                warn!(
                    competition_id = %record.id,
                    to = %target,
                    "Competition changed during sweep, leaving it for the next pass"
                );
                Outcome::Conflict
            }
            Err(e) => {
                error!(
                    competition_id = %record.id,
                    to = %target,
                    error = %e,
                    "Automatic transition failed"
                );
                Outcome::Failed
            }
        }
    }
}
