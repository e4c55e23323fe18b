mod helpers;
mod reader;
mod retention;
mod writer;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gridrank_application::ports::{DeletePredicate, RankPredicate, RecordStore, RecordTransaction};
use gridrank_domain::{
    CategoryKey, DomainError, GameRecord, RankDirection, RankField, RetentionTable, Watermark,
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use tracing::error;

pub use helpers::{format_timestamp, parse_timestamp};

/// SQLite-backed record store shared by the request path and retention.
pub struct SqliteRecordStore {
    pool: SqlitePool,
}

impl SqliteRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn find_top_ordered(
        &self,
        category: CategoryKey,
        field: RankField,
        direction: RankDirection,
        limit: usize,
    ) -> Result<Vec<GameRecord>, DomainError> {
        reader::find_top_ordered(&self.pool, category, field, direction, limit).await
    }

    async fn count_where(
        &self,
        category: CategoryKey,
        predicate: RankPredicate,
    ) -> Result<u64, DomainError> {
        reader::count_where(&self.pool, category, predicate).await
    }

    async fn find_record(
        &self,
        category: CategoryKey,
        player_id: &str,
    ) -> Result<Option<GameRecord>, DomainError> {
        reader::find_record(&self.pool, category, player_id).await
    }

    async fn save_record(&self, record: &GameRecord) -> Result<GameRecord, DomainError> {
        writer::save_record(&self.pool, record).await
    }

    async fn count_all(&self, table: RetentionTable) -> Result<u64, DomainError> {
        reader::count_all(&self.pool, table).await
    }

    async fn find_oldest_boundary(
        &self,
        table: RetentionTable,
        offset: u64,
    ) -> Result<Option<Watermark>, DomainError> {
        reader::find_oldest_boundary(&self.pool, table, offset).await
    }

    async fn find_active_players(&self, since: DateTime<Utc>) -> Result<Vec<Arc<str>>, DomainError> {
        reader::find_active_players(&self.pool, since).await
    }

    async fn find_known_players(&self) -> Result<Vec<Arc<str>>, DomainError> {
        reader::find_known_players(&self.pool).await
    }

    async fn delete_where(
        &self,
        table: RetentionTable,
        predicate: &DeletePredicate,
        batch_limit: Option<usize>,
    ) -> Result<u64, DomainError> {
        let mut conn = self.pool.acquire().await.map_err(|e| {
            error!(error = %e, "Failed to acquire connection for delete");
            DomainError::DatabaseError(e.to_string())
        })?;
        retention::delete_where(&mut *conn, table, predicate, batch_limit).await
    }

    async fn begin_transaction(&self) -> Result<Box<dyn RecordTransaction>, DomainError> {
        let tx = self.pool.begin().await.map_err(|e| {
            error!(error = %e, "Failed to begin transaction");
            DomainError::DatabaseError(e.to_string())
        })?;
        Ok(Box::new(SqliteRecordTransaction { tx }))
    }
}

/// Rolls back on drop unless committed.
pub struct SqliteRecordTransaction {
    tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl RecordTransaction for SqliteRecordTransaction {
    async fn delete_where(
        &mut self,
        table: RetentionTable,
        predicate: &DeletePredicate,
        batch_limit: Option<usize>,
    ) -> Result<u64, DomainError> {
        retention::delete_where(&mut *self.tx, table, predicate, batch_limit).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx.commit().await.map_err(|e| {
            error!(error = %e, "Failed to commit transaction");
            DomainError::DatabaseError(e.to_string())
        })
    }
}
