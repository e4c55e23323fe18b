use chrono::{DateTime, Utc};
use gridrank_domain::{
    CleanupHistory, CleanupReport, CleanupStats, DomainError, RetentionPolicy, RetentionTable, RunTrigger,
    TableRemoval, TableUsage,
};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, instrument, warn};

use crate::ports::{DeletePredicate, RecordStore, RecordTransaction};
use crate::services::{RankCache, RankStore};

/// Zombie purge and per-table size caps.
///
/// Runs are serialized by an internal lock. A failed run leaves storage as
/// it was before the zombie transaction and is recomputed from scratch on
/// the next trigger.
pub struct RetentionEngine {
    records: Arc<dyn RecordStore>,
    rank_store: Arc<RankStore>,
    cache: Arc<RankCache>,
    policy: RetentionPolicy,
    run_lock: Mutex<()>,
    stats: RwLock<CleanupStats>,
    history: RwLock<CleanupHistory>,
}

impl RetentionEngine {
    pub fn new(
        records: Arc<dyn RecordStore>,
        rank_store: Arc<RankStore>,
        cache: Arc<RankCache>,
        policy: RetentionPolicy,
    ) -> Self {
        Self {
            records,
            rank_store,
            cache,
            policy,
            run_lock: Mutex::new(()),
            stats: RwLock::new(CleanupStats::default()),
            history: RwLock::new(CleanupHistory::default()),
        }
    }

    /// Keeps the last `capacity` run reports instead of the default.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history = RwLock::new(CleanupHistory::new(capacity));
        self
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    pub async fn stats(&self) -> CleanupStats {
        self.stats.read().await.clone()
    }

    /// Past runs, newest first, failed ones included.
    pub async fn history(&self, limit: usize, offset: usize) -> Vec<CleanupReport> {
        self.history.read().await.page(limit, offset)
    }

    pub async fn history_len(&self) -> usize {
        self.history.read().await.len()
    }

    pub async fn set_next_run(&self, at: Option<DateTime<Utc>>) {
        self.stats.write().await.next_run = at;
    }

    /// Runs one full retention cycle.
    pub async fn run(&self, trigger: RunTrigger) -> Result<CleanupReport, DomainError> {
        let _guard = self.run_lock.lock().await;
        let started = Instant::now();
        let started_at = Utc::now();

        match self.execute(trigger, started_at).await {
            Ok(mut report) => {
                report.duration_ms = started.elapsed().as_millis() as u64;
                self.stats.write().await.record_success(&report);
                self.history.write().await.push(report.clone());

                if report.total_removed > 0 {
                    let views = self.rank_store.clear();
                    let entries = self.cache.clear();
                    debug!(views, entries, "Dropped rank views after retention run");
                }

                info!(
                    trigger = ?trigger,
                    zombies = report.zombies_found,
                    zombie_pass_skipped = report.zombie_pass_skipped,
                    removed = report.total_removed,
                    duration_ms = report.duration_ms,
                    "Retention run completed"
                );
                Ok(report)
            }
            Err(e) => {
                let mut failed = CleanupReport::failed(trigger, started_at, e.to_string());
                failed.duration_ms = started.elapsed().as_millis() as u64;
                self.stats.write().await.record_failure();
                self.history.write().await.push(failed);
                error!(trigger = ?trigger, error = %e, "Retention run failed");
                Err(DomainError::RetentionFailed(e.to_string()))
            }
        }
    }

    async fn execute(
        &self,
        trigger: RunTrigger,
        started_at: DateTime<Utc>,
    ) -> Result<CleanupReport, DomainError> {
        let mut report = CleanupReport::new(trigger, started_at);

        if self.zombie_pass_required(trigger).await? {
            let cutoff = self.policy.inactivity_cutoff(started_at);
            let zombies = self.detect_zombies(cutoff).await?;
            report.zombies_found = zombies.len() as u64;
            if !zombies.is_empty() {
                report.zombie_removed = self.purge_zombies(&zombies).await?;
            }
        } else {
            report.zombie_pass_skipped = true;
        }

        for table in RetentionTable::ALL {
            if let Some(max) = self.policy.table(table).cap() {
                let rows = self.enforce_cap(table, max).await?;
                if rows > 0 {
                    report.capped_removed.push(TableRemoval { table, rows });
                }
            }
        }

        report.total_removed = report
            .zombie_removed
            .iter()
            .chain(report.capped_removed.iter())
            .map(|r| r.rows)
            .sum();
        Ok(report)
    }

    /// Scheduled runs only purge zombies once the profile population
    /// exceeds its configured maximum.
    async fn zombie_pass_required(&self, trigger: RunTrigger) -> Result<bool, DomainError> {
        if trigger.is_forced() {
            return Ok(true);
        }
        let guard = self.policy.player_profiles;
        if guard.max_rows.is_none() {
            return Ok(true);
        }

        let profiles = self.records.count_all(RetentionTable::PlayerProfiles).await?;
        if !guard.is_exceeded_by(profiles) {
            debug!(
                profiles,
                max = ?guard.max_rows,
                "Profile population within bound, skipping zombie pass"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Players known to storage with no record touched since `cutoff`.
    #[instrument(skip(self))]
    pub async fn detect_zombies(&self, cutoff: DateTime<Utc>) -> Result<Vec<Arc<str>>, DomainError> {
        let active: FxHashSet<Arc<str>> = self
            .records
            .find_active_players(cutoff)
            .await?
            .into_iter()
            .collect();

        let mut zombies: Vec<Arc<str>> = self
            .records
            .find_known_players()
            .await?
            .into_iter()
            .filter(|player| !active.contains(player))
            .collect::<FxHashSet<_>>()
            .into_iter()
            .collect();
        zombies.sort_unstable();

        debug!(active = active.len(), zombies = zombies.len(), "Zombie detection finished");
        Ok(zombies)
    }

    /// Deletes every row owned by `zombies` inside one transaction.
    async fn purge_zombies(&self, zombies: &[Arc<str>]) -> Result<Vec<TableRemoval>, DomainError> {
        let mut tx = self.records.begin_transaction().await?;

        let mut removals = Vec::with_capacity(RetentionTable::ALL.len());
        for table in RetentionTable::ALL {
            let rows = self
                .delete_players(tx.as_mut(), table, zombies, table == RetentionTable::GameRecords)
                .await?;
            removals.push(TableRemoval { table, rows });
        }

        tx.commit().await?;
        info!(
            players = zombies.len(),
            game_records = removals[0].rows,
            player_profiles = removals[1].rows,
            share_rewards = removals[2].rows,
            "Zombie players purged"
        );
        Ok(removals)
    }

    async fn delete_players(
        &self,
        tx: &mut dyn RecordTransaction,
        table: RetentionTable,
        players: &[Arc<str>],
        paced: bool,
    ) -> Result<u64, DomainError> {
        let mut removed = 0;
        for (i, chunk) in players.chunks(self.policy.batch_size).enumerate() {
            if paced && i > 0 {
                tokio::time::sleep(self.policy.batch_pause).await;
            }
            removed += tx
                .delete_where(table, &DeletePredicate::PlayersIn(chunk.to_vec()), None)
                .await?;
        }
        Ok(removed)
    }

    /// Trims `table` down to `max` rows, oldest first.
    #[instrument(skip(self))]
    pub async fn enforce_cap(&self, table: RetentionTable, max: u64) -> Result<u64, DomainError> {
        let count = self.records.count_all(table).await?;
        if count <= max {
            return Ok(0);
        }

        let excess = count - max;
        let Some(watermark) = self.records.find_oldest_boundary(table, excess).await? else {
            warn!(table = %table, excess, "No watermark row found for capped table");
            return Ok(0);
        };

        let predicate = DeletePredicate::OlderThan(watermark);
        let mut remaining = excess;
        let mut removed = 0;
        let mut first = true;

        while remaining > 0 {
            if !first {
                tokio::time::sleep(self.policy.batch_pause).await;
            }
            first = false;

            let limit = remaining.min(self.policy.batch_size as u64) as usize;
            let deleted = self
                .records
                .delete_where(table, &predicate, Some(limit))
                .await?;
            if deleted == 0 {
                break;
            }
            removed += deleted;
            remaining = remaining.saturating_sub(deleted);
        }

        info!(table = %table, count, max, removed, "Table trimmed to cap");
        Ok(removed)
    }

    /// Row counts of every prunable table next to their policy.
    pub async fn table_usage(&self) -> Result<Vec<TableUsage>, DomainError> {
        let mut usage = Vec::with_capacity(RetentionTable::ALL.len());
        for table in RetentionTable::ALL {
            let policy = self.policy.table(table);
            usage.push(TableUsage {
                table,
                rows: self.records.count_all(table).await?,
                max_rows: policy.max_rows,
                enforce_cap: policy.enforce_cap,
            });
        }
        Ok(usage)
    }
}
