use async_trait::async_trait;
use dashmap::DashMap;
use gridrank_domain::{DomainError, RankEntry, RankKey};
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::ports::{CacheMaintenancePort, CacheSweepOutcome};

pub type RankPayload = Arc<[RankEntry]>;

struct CacheEntry {
    payload: RankPayload,
    expires_at: Instant,
    seq: u64,
}

impl CacheEntry {
    #[inline]
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub sweeps: u64,
    pub evicted: u64,
    pub hit_rate: f64,
}

/// Time-bounded cache of materialized rank lists.
pub struct RankCache {
    ttl: Duration,
    max_entries: usize,
    entries: DashMap<RankKey, CacheEntry, FxBuildHasher>,
    next_seq: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    sweeps: AtomicU64,
    evicted: AtomicU64,
}

impl RankCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            ttl,
            max_entries,
            entries: DashMap::with_hasher(FxBuildHasher),
            next_seq: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sweeps: AtomicU64::new(0),
            evicted: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &RankKey) -> Option<RankPayload> {
        let now = Instant::now();
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.payload.clone());
            }
        }

        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn put(&self, key: RankKey, payload: RankPayload) {
        let entry = CacheEntry {
            payload,
            expires_at: Instant::now() + self.ttl,
            seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
        };
        self.entries.insert(key, entry);
    }

    pub fn invalidate(&self, key: &RankKey) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes expired entries, then the oldest half by insertion order if
    /// the cache is still above `max_entries`.
    pub fn sweep(&self) -> CacheSweepOutcome {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let expired_removed = before.saturating_sub(self.entries.len());

        let mut evicted = 0;
        let size = self.entries.len();
        if size > self.max_entries {
            let mut by_age: Vec<(u64, RankKey)> = self
                .entries
                .iter()
                .map(|e| (e.value().seq, *e.key()))
                .collect();
            by_age.sort_unstable_by_key(|(seq, _)| *seq);

            let target = size.div_ceil(2);
            for (_, key) in by_age.into_iter().take(target) {
                if self.entries.remove(&key).is_some() {
                    evicted += 1;
                }
            }
        }

        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.evicted.fetch_add(evicted as u64, Ordering::Relaxed);

        let outcome = CacheSweepOutcome {
            expired_removed,
            evicted,
            cache_size: self.entries.len(),
        };
        debug!(
            expired = outcome.expired_removed,
            evicted = outcome.evicted,
            size = outcome.cache_size,
            "Rank cache swept"
        );
        outcome
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        CacheStats {
            entries: self.entries.len(),
            hits,
            misses,
            sweeps: self.sweeps.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            hit_rate: if lookups == 0 {
                0.0
            } else {
                hits as f64 / lookups as f64
            },
        }
    }
}

#[async_trait]
impl CacheMaintenancePort for RankCache {
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError> {
        Ok(self.sweep())
    }
}
