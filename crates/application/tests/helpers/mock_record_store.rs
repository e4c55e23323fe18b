#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use gridrank_application::ports::{DeletePredicate, RankPredicate, RecordStore, RecordTransaction};
use gridrank_domain::{
    CategoryKey, DomainError, GameRecord, RankDirection, RankField, RetentionTable, Watermark,
};
use std::cmp::Ordering as CmpOrdering;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::{Notify, RwLock};

/// Parks one `find_top_ordered` call after it has read its rows.
#[derive(Default)]
pub struct QueryGate {
    pub reached: Notify,
    pub release: Notify,
}

/// Profile or share-reward row; only the columns retention looks at.
#[derive(Debug, Clone)]
pub struct MockRow {
    pub id: i64,
    pub player_id: Arc<str>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct MockState {
    pub records: Vec<GameRecord>,
    pub profiles: Vec<MockRow>,
    pub rewards: Vec<MockRow>,
    pub next_id: i64,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn aged_rows(&self, table: RetentionTable) -> Vec<(DateTime<Utc>, i64)> {
        let mut rows: Vec<(DateTime<Utc>, i64)> = match table {
            RetentionTable::GameRecords => self
                .records
                .iter()
                .map(|r| (r.record_time, r.id.unwrap_or_default()))
                .collect(),
            RetentionTable::PlayerProfiles => {
                self.profiles.iter().map(|r| (r.updated_at, r.id)).collect()
            }
            RetentionTable::ShareRewards => {
                self.rewards.iter().map(|r| (r.updated_at, r.id)).collect()
            }
        };
        rows.sort();
        rows
    }

    fn count(&self, table: RetentionTable) -> u64 {
        match table {
            RetentionTable::GameRecords => self.records.len() as u64,
            RetentionTable::PlayerProfiles => self.profiles.len() as u64,
            RetentionTable::ShareRewards => self.rewards.len() as u64,
        }
    }

    fn delete(
        &mut self,
        table: RetentionTable,
        predicate: &DeletePredicate,
        batch_limit: Option<usize>,
    ) -> u64 {
        let mut doomed: Vec<i64> = match predicate {
            DeletePredicate::PlayersIn(players) => {
                let players: HashSet<&str> = players.iter().map(|p| p.as_ref()).collect();
                match table {
                    RetentionTable::GameRecords => self
                        .records
                        .iter()
                        .filter(|r| players.contains(r.player_id.as_ref()))
                        .map(|r| r.id.unwrap_or_default())
                        .collect(),
                    RetentionTable::PlayerProfiles => self
                        .profiles
                        .iter()
                        .filter(|r| players.contains(r.player_id.as_ref()))
                        .map(|r| r.id)
                        .collect(),
                    RetentionTable::ShareRewards => self
                        .rewards
                        .iter()
                        .filter(|r| players.contains(r.player_id.as_ref()))
                        .map(|r| r.id)
                        .collect(),
                }
            }
            DeletePredicate::OlderThan(mark) => self
                .aged_rows(table)
                .into_iter()
                .filter(|(ts, id)| (*ts, *id) < (mark.timestamp, mark.id))
                .map(|(_, id)| id)
                .collect(),
        };
        if let Some(limit) = batch_limit {
            doomed.truncate(limit);
        }

        let doomed: HashSet<i64> = doomed.into_iter().collect();
        let before = self.count(table);
        match table {
            RetentionTable::GameRecords => self
                .records
                .retain(|r| !doomed.contains(&r.id.unwrap_or_default())),
            RetentionTable::PlayerProfiles => self.profiles.retain(|r| !doomed.contains(&r.id)),
            RetentionTable::ShareRewards => self.rewards.retain(|r| !doomed.contains(&r.id)),
        }
        before - self.count(table)
    }
}

#[derive(Clone)]
pub struct MockRecordStore {
    state: Arc<RwLock<MockState>>,
    fail_transaction_deletes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    fail_counts: Arc<AtomicBool>,
    top_gate: Arc<Mutex<Option<Arc<QueryGate>>>>,
    top_queries: Arc<AtomicU64>,
    commits: Arc<AtomicU64>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState::default())),
            fail_transaction_deletes: Arc::new(AtomicBool::new(false)),
            fail_reads: Arc::new(AtomicBool::new(false)),
            fail_counts: Arc::new(AtomicBool::new(false)),
            top_gate: Arc::new(Mutex::new(None)),
            top_queries: Arc::new(AtomicU64::new(0)),
            commits: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Inserts a record touched `days_ago` days back, with a profile row.
    pub async fn add_record(
        &self,
        player_id: &str,
        category: CategoryKey,
        score: f64,
        days_ago: i64,
    ) -> GameRecord {
        let mut state = self.state.write().await;
        let id = state.next_id();
        let at = Utc::now() - Duration::days(days_ago);
        let record = GameRecord {
            id: Some(id),
            player_id: player_id.into(),
            category,
            score,
            play_time: 0.0,
            nick_name: player_id.into(),
            avatar_url: "".into(),
            record_time: at,
        };
        state.records.push(record.clone());

        if !state.profiles.iter().any(|p| &*p.player_id == player_id) {
            let id = state.next_id();
            state.profiles.push(MockRow {
                id,
                player_id: player_id.into(),
                updated_at: at,
            });
        }
        record
    }

    pub async fn add_record_at(
        &self,
        player_id: &str,
        category: CategoryKey,
        score: f64,
        at: DateTime<Utc>,
    ) {
        let mut state = self.state.write().await;
        let id = state.next_id();
        state.records.push(GameRecord {
            id: Some(id),
            player_id: player_id.into(),
            category,
            score,
            play_time: 0.0,
            nick_name: player_id.into(),
            avatar_url: "".into(),
            record_time: at,
        });
    }

    /// Profile without any game record.
    pub async fn add_profile(&self, player_id: &str, days_ago: i64) {
        let mut state = self.state.write().await;
        let id = state.next_id();
        state.profiles.push(MockRow {
            id,
            player_id: player_id.into(),
            updated_at: Utc::now() - Duration::days(days_ago),
        });
    }

    pub async fn add_reward(&self, player_id: &str, days_ago: i64) {
        let mut state = self.state.write().await;
        let id = state.next_id();
        state.rewards.push(MockRow {
            id,
            player_id: player_id.into(),
            updated_at: Utc::now() - Duration::days(days_ago),
        });
    }

    pub async fn snapshot(&self) -> MockState {
        self.state.read().await.clone()
    }

    pub async fn count(&self, table: RetentionTable) -> u64 {
        self.state.read().await.count(table)
    }

    pub async fn has_player(&self, player_id: &str) -> bool {
        let state = self.state.read().await;
        state.records.iter().any(|r| &*r.player_id == player_id)
            || state.profiles.iter().any(|r| &*r.player_id == player_id)
            || state.rewards.iter().any(|r| &*r.player_id == player_id)
    }

    pub fn set_fail_transaction_deletes(&self, fail: bool) {
        self.fail_transaction_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Only `count_where` fails; writes and lookups keep working.
    pub fn set_fail_counts(&self, fail: bool) {
        self.fail_counts.store(fail, Ordering::SeqCst);
    }

    pub fn hold_next_top_query(&self) -> Arc<QueryGate> {
        let gate = Arc::new(QueryGate::default());
        *self.top_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    pub fn top_queries(&self) -> u64 {
        self.top_queries.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> u64 {
        self.commits.load(Ordering::SeqCst)
    }

    fn check_reads(&self) -> Result<(), DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock read failure".to_string()));
        }
        Ok(())
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

fn rank_cmp(field: RankField, direction: RankDirection, a: &GameRecord, b: &GameRecord) -> CmpOrdering {
    direction
        .compare(a.value(field), b.value(field))
        .then(a.id.cmp(&b.id))
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn find_top_ordered(
        &self,
        category: CategoryKey,
        field: RankField,
        direction: RankDirection,
        limit: usize,
    ) -> Result<Vec<GameRecord>, DomainError> {
        self.check_reads()?;
        self.top_queries.fetch_add(1, Ordering::SeqCst);
        let state = self.state.read().await;
        let mut rows: Vec<GameRecord> = state
            .records
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect();
        drop(state);
        rows.sort_by(|a, b| rank_cmp(field, direction, a, b));
        rows.truncate(limit);

        let gate = self.top_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }
        Ok(rows)
    }

    async fn count_where(
        &self,
        category: CategoryKey,
        predicate: RankPredicate,
    ) -> Result<u64, DomainError> {
        self.check_reads()?;
        if self.fail_counts.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock count timeout".to_string()));
        }
        let state = self.state.read().await;
        let count = state
            .records
            .iter()
            .filter(|r| r.category == category)
            .filter(|r| match predicate {
                RankPredicate::All => true,
                RankPredicate::StrictlyBetter {
                    field,
                    direction,
                    value,
                } => direction.is_strictly_better(r.value(field), value),
            })
            .count();
        Ok(count as u64)
    }

    async fn find_record(
        &self,
        category: CategoryKey,
        player_id: &str,
    ) -> Result<Option<GameRecord>, DomainError> {
        self.check_reads()?;
        let state = self.state.read().await;
        Ok(state
            .records
            .iter()
            .find(|r| r.category == category && &*r.player_id == player_id)
            .cloned())
    }

    async fn save_record(&self, record: &GameRecord) -> Result<GameRecord, DomainError> {
        let mut state = self.state.write().await;
        let existing = state
            .records
            .iter()
            .position(|r| r.category == record.category && r.player_id == record.player_id);

        let saved = match existing {
            Some(pos) => {
                let mut saved = record.clone();
                saved.id = state.records[pos].id;
                state.records[pos] = saved.clone();
                saved
            }
            None => {
                let mut saved = record.clone();
                saved.id = Some(state.next_id());
                state.records.push(saved.clone());
                saved
            }
        };

        let profile = state
            .profiles
            .iter()
            .position(|p| p.player_id == record.player_id);
        if let Some(pos) = profile {
            state.profiles[pos].updated_at = record.record_time;
        } else {
            let id = state.next_id();
            state.profiles.push(MockRow {
                id,
                player_id: record.player_id.clone(),
                updated_at: record.record_time,
            });
        }
        Ok(saved)
    }

    async fn count_all(&self, table: RetentionTable) -> Result<u64, DomainError> {
        self.check_reads()?;
        Ok(self.state.read().await.count(table))
    }

    async fn find_oldest_boundary(
        &self,
        table: RetentionTable,
        offset: u64,
    ) -> Result<Option<Watermark>, DomainError> {
        self.check_reads()?;
        let state = self.state.read().await;
        Ok(state
            .aged_rows(table)
            .get(offset as usize)
            .map(|(timestamp, id)| Watermark {
                id: *id,
                timestamp: *timestamp,
            }))
    }

    async fn find_active_players(&self, since: DateTime<Utc>) -> Result<Vec<Arc<str>>, DomainError> {
        self.check_reads()?;
        let state = self.state.read().await;
        let active: HashSet<Arc<str>> = state
            .records
            .iter()
            .filter(|r| r.record_time >= since)
            .map(|r| r.player_id.clone())
            .collect();
        Ok(active.into_iter().collect())
    }

    async fn find_known_players(&self) -> Result<Vec<Arc<str>>, DomainError> {
        self.check_reads()?;
        let state = self.state.read().await;
        let known: HashSet<Arc<str>> = state
            .profiles
            .iter()
            .map(|p| p.player_id.clone())
            .chain(state.records.iter().map(|r| r.player_id.clone()))
            .collect();
        Ok(known.into_iter().collect())
    }

    async fn delete_where(
        &self,
        table: RetentionTable,
        predicate: &DeletePredicate,
        batch_limit: Option<usize>,
    ) -> Result<u64, DomainError> {
        Ok(self.state.write().await.delete(table, predicate, batch_limit))
    }

    async fn begin_transaction(&self) -> Result<Box<dyn RecordTransaction>, DomainError> {
        let working = self.state.read().await.clone();
        Ok(Box::new(MockTransaction {
            target: self.state.clone(),
            working,
            fail_deletes: self.fail_transaction_deletes.load(Ordering::SeqCst),
            commits: self.commits.clone(),
        }))
    }
}

/// Applies deletes to a private copy; commit publishes it, drop discards it.
pub struct MockTransaction {
    target: Arc<RwLock<MockState>>,
    working: MockState,
    fail_deletes: bool,
    commits: Arc<AtomicU64>,
}

#[async_trait]
impl RecordTransaction for MockTransaction {
    async fn delete_where(
        &mut self,
        table: RetentionTable,
        predicate: &DeletePredicate,
        batch_limit: Option<usize>,
    ) -> Result<u64, DomainError> {
        if self.fail_deletes && table == RetentionTable::PlayerProfiles {
            return Err(DomainError::DatabaseError("mock delete failure".to_string()));
        }
        Ok(self.working.delete(table, predicate, batch_limit))
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let this = *self;
        *this.target.write().await = this.working;
        this.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
