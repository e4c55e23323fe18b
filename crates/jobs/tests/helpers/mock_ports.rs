#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use gridrank_application::ports::{
    CacheMaintenancePort, CacheSweepOutcome, DeletePredicate, RankPredicate, RecordStore,
    RecordTransaction,
};
use gridrank_application::services::{RankCache, RankStore, RetentionEngine};
use gridrank_domain::{
    CategoryKey, CategoryRules, DomainError, GameRecord, RankDirection, RankField,
    RetentionPolicy, RetentionTable, Watermark,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

pub struct MockCacheMaintenancePort {
    sweep_call_count: Arc<AtomicU64>,
    should_fail: Arc<RwLock<bool>>,
    outcome: CacheSweepOutcome,
}

impl MockCacheMaintenancePort {
    pub fn new() -> Self {
        Self {
            sweep_call_count: Arc::new(AtomicU64::new(0)),
            should_fail: Arc::new(RwLock::new(false)),
            outcome: CacheSweepOutcome::default(),
        }
    }

    pub fn with_outcome(mut self, outcome: CacheSweepOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    pub fn sweep_call_count(&self) -> u64 {
        self.sweep_call_count.load(Ordering::Relaxed)
    }

    pub async fn set_should_fail(&self, fail: bool) {
        *self.should_fail.write().await = fail;
    }
}

#[async_trait]
impl CacheMaintenancePort for MockCacheMaintenancePort {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        self.sweep_call_count.fetch_add(1, Ordering::Relaxed);
        if *self.should_fail.read().await {
            return Err(DomainError::DatabaseError("mock sweep failure".into()));
        }
        Ok(self.outcome)
    }
}

/// Storage with no rows; counts how often the retention engine consults it.
#[derive(Default)]
pub struct EmptyRecordStore {
    count_calls: AtomicU64,
    fail: AtomicBool,
    count_delay: Duration,
}

impl EmptyRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::Relaxed);
        store
    }

    /// Every `count_all` takes `delay` of tokio time.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.count_delay = delay;
        self
    }

    pub fn count_calls(&self) -> u64 {
        self.count_calls.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::Relaxed) {
            return Err(DomainError::DatabaseError("mock storage offline".into()));
        }
        Ok(())
    }
}

struct NoopTransaction;

#[async_trait]
impl RecordTransaction for NoopTransaction {
    async fn delete_where(
        &mut self,
        _table: RetentionTable,
        _predicate: &DeletePredicate,
        _batch_limit: Option<usize>,
    ) -> Result<u64, DomainError> {
        Ok(0)
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}

#[async_trait]
impl RecordStore for EmptyRecordStore {
    async fn find_top_ordered(
        &self,
        _category: CategoryKey,
        _field: RankField,
        _direction: RankDirection,
        _limit: usize,
    ) -> Result<Vec<GameRecord>, DomainError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn count_where(
        &self,
        _category: CategoryKey,
        _predicate: RankPredicate,
    ) -> Result<u64, DomainError> {
        self.check()?;
        Ok(0)
    }

    async fn find_record(
        &self,
        _category: CategoryKey,
        _player_id: &str,
    ) -> Result<Option<GameRecord>, DomainError> {
        self.check()?;
        Ok(None)
    }

    async fn save_record(&self, record: &GameRecord) -> Result<GameRecord, DomainError> {
        self.check()?;
        Ok(record.clone())
    }

    async fn count_all(&self, _table: RetentionTable) -> Result<u64, DomainError> {
        self.count_calls.fetch_add(1, Ordering::Relaxed);
        if !self.count_delay.is_zero() {
            tokio::time::sleep(self.count_delay).await;
        }
        self.check()?;
        Ok(0)
    }

    async fn find_oldest_boundary(
        &self,
        _table: RetentionTable,
        _offset: u64,
    ) -> Result<Option<Watermark>, DomainError> {
        self.check()?;
        Ok(None)
    }

    async fn find_active_players(
        &self,
        _since: DateTime<Utc>,
    ) -> Result<Vec<Arc<str>>, DomainError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn find_known_players(&self) -> Result<Vec<Arc<str>>, DomainError> {
        self.check()?;
        Ok(Vec::new())
    }

    async fn delete_where(
        &self,
        _table: RetentionTable,
        _predicate: &DeletePredicate,
        _batch_limit: Option<usize>,
    ) -> Result<u64, DomainError> {
        self.check()?;
        Ok(0)
    }

    async fn begin_transaction(&self) -> Result<Box<dyn RecordTransaction>, DomainError> {
        self.check()?;
        Ok(Box::new(NoopTransaction))
    }
}

pub fn make_engine(store: Arc<EmptyRecordStore>) -> Arc<RetentionEngine> {
    let records: Arc<dyn RecordStore> = store;
    let rank_store = Arc::new(RankStore::new(
        records.clone(),
        CategoryRules::default(),
        10,
        Duration::from_secs(300),
    ));
    let cache = Arc::new(RankCache::new(Duration::from_secs(30), 100));
    Arc::new(RetentionEngine::new(
        records,
        rank_store,
        cache,
        RetentionPolicy::default(),
    ))
}
