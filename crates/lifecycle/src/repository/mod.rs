pub mod competition;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CompetitionRecord, CompetitionStatus};

pub use competition::CompetitionRepository;
pub use memory::InMemoryCompetitionStore;

/// Persistence boundary of the lifecycle engine.
///
/// `update_status` is the only write path used by the engine and must be an
/// atomic compare-and-set on `updated_at`.
#[async_trait]
pub trait CompetitionStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<CompetitionRecord>;

    async fn list(&self, offset: u32, limit: u32) -> Result<Vec<CompetitionRecord>>;

    async fn count(&self) -> Result<i64>;

    async fn list_by_status(
        &self,
        statuses: &[CompetitionStatus],
    ) -> Result<Vec<CompetitionRecord>>;

    /// Write `new_status` if the stored `updated_at` still equals `expected`.
    ///
    /// Fails with `Conflict` when the token is stale and `NotFound` when the
    /// record is gone.
    async fn update_status(
        &self,
        id: Uuid,
        expected: DateTime<Utc>,
        new_status: CompetitionStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<CompetitionRecord>;
}
