use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CompetitionStore;
use crate::error::{LifecycleError, Result};
use crate::models::{CompetitionRecord, CompetitionStatus};

/// Process-local competition store.
///
/// The compare-and-set in `update_status` runs under a single write guard, so
/// it offers the same guarantee as the conditional `UPDATE` in PostgreSQL.
#[derive(Debug, Default)]
pub struct InMemoryCompetitionStore {
    records: RwLock<HashMap<Uuid, CompetitionRecord>>,
}

impl InMemoryCompetitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: impl IntoIterator<Item = CompetitionRecord>) -> Self {
        Self {
            records: RwLock::new(records.into_iter().map(|r| (r.id, r)).collect()),
        }
    }
}

#[async_trait]
impl CompetitionStore for InMemoryCompetitionStore {
    async fn find_by_id(&self, id: Uuid) -> Result<CompetitionRecord> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(LifecycleError::NotFound)
    }

    async fn list(&self, offset: u32, limit: u32) -> Result<Vec<CompetitionRecord>> {
        let mut records: Vec<CompetitionRecord> =
            self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));

        Ok(records
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn list_by_status(
        &self,
        statuses: &[CompetitionStatus],
    ) -> Result<Vec<CompetitionRecord>> {
        let mut records: Vec<CompetitionRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| statuses.contains(&r.status))
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);

        Ok(records)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: DateTime<Utc>,
        new_status: CompetitionStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<CompetitionRecord> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(LifecycleError::NotFound)?;

        if record.updated_at != expected {
            return Err(LifecycleError::Conflict {
                expected,
                actual: record.updated_at,
            });
        }

        record.status = new_status;
        record.updated_at = updated_at;

        Ok(record.clone())
    }
}
