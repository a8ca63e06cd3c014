use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::CompetitionStore;
use crate::error::{LifecycleError, Result};
use crate::models::{CompetitionRecord, CompetitionStatus};

const COLUMNS: &str = r#"
    id, status, nomination_start, nomination_end, voting_start, voting_end,
    finals_date, city_id, category_id, demographic_id, host_id,
    min_contestants, max_contestants, updated_at
"#;

/// Raw `competitions` row. Status spelling is resolved when converting to a
/// [`CompetitionRecord`].
#[derive(Debug, FromRow)]
struct CompetitionRow {
    id: Uuid,
    status: String,
    nomination_start: Option<DateTime<Utc>>,
    nomination_end: Option<DateTime<Utc>>,
    voting_start: Option<DateTime<Utc>>,
    voting_end: Option<DateTime<Utc>>,
    finals_date: Option<DateTime<Utc>>,
    city_id: Option<Uuid>,
    category_id: Option<Uuid>,
    demographic_id: Option<Uuid>,
    host_id: Option<Uuid>,
    min_contestants: Option<i32>,
    max_contestants: Option<i32>,
    updated_at: DateTime<Utc>,
}

impl CompetitionRow {
    fn into_record(self) -> Result<CompetitionRecord> {
        let status = self
            .status
            .parse::<CompetitionStatus>()
            .map_err(|e| {
                LifecycleError::MalformedRecord(format!("competition {}: {}", self.id, e))
            })?;

        Ok(CompetitionRecord {
            id: self.id,
            status,
            nomination_start: self.nomination_start,
            nomination_end: self.nomination_end,
            voting_start: self.voting_start,
            voting_end: self.voting_end,
            finals_date: self.finals_date,
            city_id: self.city_id,
            category_id: self.category_id,
            demographic_id: self.demographic_id,
            host_id: self.host_id,
            min_contestants: self.min_contestants,
            max_contestants: self.max_contestants,
            updated_at: self.updated_at,
        })
    }
}

fn into_records(rows: Vec<CompetitionRow>) -> Result<Vec<CompetitionRecord>> {
    rows.into_iter().map(CompetitionRow::into_record).collect()
}

/// PostgreSQL-backed competition store
#[derive(Clone)]
pub struct CompetitionRepository {
    pool: PgPool,
}

impl CompetitionRepository {
    /// Create a new CompetitionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CompetitionStore for CompetitionRepository {
    /// Get a competition by ID
    async fn find_by_id(&self, id: Uuid) -> Result<CompetitionRecord> {
        let row = sqlx::query_as::<_, CompetitionRow>(&format!(
            "SELECT {COLUMNS} FROM competitions WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LifecycleError::NotFound)?;

        row.into_record()
    }

    /// List competitions, most recently changed first
    async fn list(&self, offset: u32, limit: u32) -> Result<Vec<CompetitionRecord>> {
        let rows = sqlx::query_as::<_, CompetitionRow>(&format!(
            "SELECT {COLUMNS} FROM competitions ORDER BY updated_at DESC, id OFFSET $1 LIMIT $2"
        ))
        .bind(i64::from(offset))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        into_records(rows)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM competitions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// List competitions in any of the given statuses, legacy spellings included
    async fn list_by_status(
        &self,
        statuses: &[CompetitionStatus],
    ) -> Result<Vec<CompetitionRecord>> {
        let values: Vec<String> = statuses
            .iter()
            .flat_map(|s| s.stored_values().iter().map(|v| v.to_string()))
            .collect();

        let rows = sqlx::query_as::<_, CompetitionRow>(&format!(
            "SELECT {COLUMNS} FROM competitions WHERE status = ANY($1) ORDER BY id"
        ))
        .bind(values)
        .fetch_all(&self.pool)
        .await?;

        into_records(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: DateTime<Utc>,
        new_status: CompetitionStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<CompetitionRecord> {
        let row = sqlx::query_as::<_, CompetitionRow>(&format!(
            r#"
            UPDATE competitions
            SET status = $3, updated_at = $4
            WHERE id = $1 AND updated_at = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected)
        .bind(new_status.as_str())
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_record(),
            None => {
                // Either the record is gone or someone else wrote first.
                let current = self.find_by_id(id).await?;
                Err(LifecycleError::Conflict {
                    expected,
                    actual: current.updated_at,
                })
            }
        }
    }
}
