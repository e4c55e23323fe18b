use dashmap::DashMap;
use gridrank_domain::{
    CategoryRules, DomainError, GameRecord, PlayerRank, RankDirection, RankEntry, RankKey,
};
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use crate::ports::{RankPredicate, RecordStore};

struct RankSlot {
    entry: RankEntry,
    seq: u64,
}

/// One bounded, ordered view plus its player index.
struct RankView {
    key: RankKey,
    direction: RankDirection,
    slots: Vec<RankSlot>,
    positions: FxHashMap<Arc<str>, usize>,
    hydrated_at: Instant,
}

impl RankView {
    fn new(key: RankKey, direction: RankDirection) -> Self {
        Self {
            key,
            direction,
            slots: Vec::new(),
            positions: FxHashMap::default(),
            hydrated_at: Instant::now(),
        }
    }

    fn value(&self, slot: &RankSlot) -> f64 {
        slot.entry.value(self.key.field)
    }

    fn resort(&mut self) {
        let field = self.key.field;
        let direction = self.direction;
        self.slots.sort_by(|a, b| {
            direction
                .compare(a.entry.value(field), b.entry.value(field))
                .then(a.seq.cmp(&b.seq))
        });
        self.positions.clear();
        for (i, slot) in self.slots.iter().enumerate() {
            self.positions.insert(slot.entry.player_id.clone(), i);
        }
    }

    fn apply(&mut self, entry: RankEntry, capacity: usize, seq: u64) -> bool {
        if let Some(&pos) = self.positions.get(&entry.player_id) {
            self.slots[pos].entry = entry;
            self.resort();
            return true;
        }

        if self.slots.len() < capacity {
            self.slots.push(RankSlot { entry, seq });
            self.resort();
            return true;
        }

        let candidate = entry.value(self.key.field);
        let beats_worst = self
            .slots
            .last()
            .is_some_and(|worst| self.direction.is_strictly_better(candidate, self.value(worst)));
        if !beats_worst {
            return false;
        }

        if let Some(evicted) = self.slots.pop() {
            debug!(view = %self.key, evicted = %evicted.entry.player_id, "Evicted worst entry");
        }
        self.slots.push(RankSlot { entry, seq });
        self.resort();
        true
    }
}

/// Bounded top-N views per `(category, field)`, updated incrementally.
///
/// Views are created only by [`RankStore::hydrate`]; upserts against a key
/// that has never been pulled from storage are ignored so that a partial
/// list is never served as a complete one.
///
/// Every upsert bumps a per-key write version, hydrated or not. A reader
/// captures the version before querying storage and hands it back to
/// [`RankStore::hydrate_if_unchanged`], which refuses rows that a
/// concurrent write has already made stale.
pub struct RankStore {
    records: Arc<dyn RecordStore>,
    rules: CategoryRules,
    capacity: usize,
    refresh_after: Duration,
    views: DashMap<RankKey, RankView, FxBuildHasher>,
    versions: DashMap<RankKey, u64, FxBuildHasher>,
    next_seq: AtomicU64,
}

impl RankStore {
    pub fn new(
        records: Arc<dyn RecordStore>,
        rules: CategoryRules,
        capacity: usize,
        refresh_after: Duration,
    ) -> Self {
        Self {
            records,
            rules,
            capacity: capacity.max(1),
            refresh_after,
            views: DashMap::with_hasher(FxBuildHasher),
            versions: DashMap::with_hasher(FxBuildHasher),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn direction(&self, key: RankKey) -> RankDirection {
        self.rules.direction(key)
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::Relaxed)
    }

    /// Replaces the view for `key` with rows already ordered by storage.
    pub fn hydrate(&self, key: RankKey, rows: &[GameRecord]) {
        let _version = self.versions.entry(key).or_insert(0);
        self.views.insert(key, self.build_view(key, rows));
        debug!(view = %key, entries = rows.len().min(self.capacity), "Rank view hydrated");
    }

    /// Write version of `key`; changes whenever a record of its category is
    /// upserted.
    pub fn write_version(&self, key: RankKey) -> u64 {
        self.versions.get(&key).map_or(0, |v| *v)
    }

    /// Hydrates only if no upsert touched `key` since `seen` was read.
    ///
    /// The check and the swap happen under the version entry lock, which
    /// `upsert` also holds while applying, so a write is never lost between
    /// them.
    pub fn hydrate_if_unchanged(&self, key: RankKey, rows: &[GameRecord], seen: u64) -> bool {
        let version = self.versions.entry(key).or_insert(0);
        if *version != seen {
            debug!(view = %key, seen, current = *version, "Discarding rows raced by a write");
            return false;
        }
        self.views.insert(key, self.build_view(key, rows));
        debug!(view = %key, entries = rows.len().min(self.capacity), "Rank view hydrated");
        true
    }

    fn build_view(&self, key: RankKey, rows: &[GameRecord]) -> RankView {
        let mut view = RankView::new(key, self.direction(key));
        for record in rows.iter().take(self.capacity) {
            if view.positions.contains_key(&record.player_id) {
                continue;
            }
            let seq = self.next_seq();
            view.positions
                .insert(record.player_id.clone(), view.slots.len());
            view.slots.push(RankSlot {
                entry: RankEntry::from(record),
                seq,
            });
        }
        view.resort();
        view
    }

    /// Repositions `record` in every hydrated view of its category.
    ///
    /// Returns whether any view changed.
    pub fn upsert(&self, record: &GameRecord) -> bool {
        if let Err(e) = record.validate() {
            warn!(error = %e, "Ignoring rank update for invalid record");
            return false;
        }

        let mut changed = false;
        for (key, _) in self.rules.views(record.category) {
            let mut version = self.versions.entry(key).or_insert(0);
            *version += 1;
            let seq = self.next_seq();
            if let Some(mut view) = self.views.get_mut(&key) {
                changed |= view.apply(RankEntry::from(record), self.capacity, seq);
            }
        }
        changed
    }

    /// Snapshot of the view, or `None` when the key was never hydrated.
    pub fn top_n(&self, key: RankKey) -> Option<Vec<RankEntry>> {
        self.views
            .get(&key)
            .map(|view| view.slots.iter().map(|s| s.entry.clone()).collect())
    }

    pub fn is_fresh(&self, key: RankKey) -> bool {
        self.views
            .get(&key)
            .is_some_and(|view| view.hydrated_at.elapsed() < self.refresh_after)
    }

    pub fn contains(&self, key: RankKey, player_id: &str) -> bool {
        self.views
            .get(&key)
            .is_some_and(|view| view.positions.contains_key(player_id))
    }

    pub fn invalidate(&self, key: RankKey) -> bool {
        self.views.remove(&key).is_some()
    }

    /// Drops every view; returns how many were held.
    pub fn clear(&self) -> usize {
        let count = self.views.len();
        self.views.clear();
        count
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Absolute position of the player's persisted record.
    ///
    /// Always answered from storage: the bounded view cannot rank players
    /// outside the top N.
    #[instrument(skip(self))]
    pub async fn rank_of(
        &self,
        key: RankKey,
        player_id: &str,
    ) -> Result<Option<PlayerRank>, DomainError> {
        let Some(record) = self.records.find_record(key.category, player_id).await? else {
            return Ok(None);
        };

        let value = record.value(key.field);
        let ahead = self
            .records
            .count_where(
                key.category,
                RankPredicate::StrictlyBetter {
                    field: key.field,
                    direction: self.direction(key),
                    value,
                },
            )
            .await?;

        Ok(Some(PlayerRank {
            player_id: record.player_id,
            score: value,
            rank: ahead + 1,
        }))
    }
}
