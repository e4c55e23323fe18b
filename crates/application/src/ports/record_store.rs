use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gridrank_domain::{
    CategoryKey, DomainError, GameRecord, RankDirection, RankField, RetentionTable, Watermark,
};
use std::sync::Arc;

/// Filter for counting records inside one category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RankPredicate {
    All,
    /// Records that rank strictly ahead of `value` in `direction`.
    StrictlyBetter {
        field: RankField,
        direction: RankDirection,
        value: f64,
    },
}

/// Row selection for retention deletes.
#[derive(Debug, Clone, PartialEq)]
pub enum DeletePredicate {
    PlayersIn(Vec<Arc<str>>),
    /// Rows ordered strictly before the watermark by `(age column, id)`.
    OlderThan(Watermark),
}

/// An open storage transaction. Dropping it without `commit` rolls back.
#[async_trait]
pub trait RecordTransaction: Send {
    async fn delete_where(
        &mut self,
        table: RetentionTable,
        predicate: &DeletePredicate,
        batch_limit: Option<usize>,
    ) -> Result<u64, DomainError>;

    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_top_ordered(
        &self,
        category: CategoryKey,
        field: RankField,
        direction: RankDirection,
        limit: usize,
    ) -> Result<Vec<GameRecord>, DomainError>;

    async fn count_where(
        &self,
        category: CategoryKey,
        predicate: RankPredicate,
    ) -> Result<u64, DomainError>;

    async fn find_record(
        &self,
        category: CategoryKey,
        player_id: &str,
    ) -> Result<Option<GameRecord>, DomainError>;

    /// Upserts on `(player_id, game_type, sub_type)` and refreshes the
    /// player's profile display fields.
    async fn save_record(&self, record: &GameRecord) -> Result<GameRecord, DomainError>;

    async fn count_all(&self, table: RetentionTable) -> Result<u64, DomainError>;

    /// Row at `offset` when the table is ordered oldest-first.
    async fn find_oldest_boundary(
        &self,
        table: RetentionTable,
        offset: u64,
    ) -> Result<Option<Watermark>, DomainError>;

    async fn find_active_players(&self, since: DateTime<Utc>) -> Result<Vec<Arc<str>>, DomainError>;

    async fn find_known_players(&self) -> Result<Vec<Arc<str>>, DomainError>;

    /// Autocommit delete. With `batch_limit` only the oldest matching rows go.
    async fn delete_where(
        &self,
        table: RetentionTable,
        predicate: &DeletePredicate,
        batch_limit: Option<usize>,
    ) -> Result<u64, DomainError>;

    async fn begin_transaction(&self) -> Result<Box<dyn RecordTransaction>, DomainError>;
}
