use crate::retention::RetentionTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunTrigger {
    Scheduled,
    Forced,
}

impl RunTrigger {
    pub fn is_forced(self) -> bool {
        matches!(self, RunTrigger::Forced)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRemoval {
    pub table: RetentionTable,
    pub rows: u64,
}

/// What one retention run removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupReport {
    pub trigger: RunTrigger,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub zombies_found: u64,
    pub zombie_pass_skipped: bool,
    pub zombie_removed: Vec<TableRemoval>,
    pub capped_removed: Vec<TableRemoval>,
    pub total_removed: u64,
    /// Set when the run aborted; such a report carries no removals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CleanupReport {
    pub fn new(trigger: RunTrigger, started_at: DateTime<Utc>) -> Self {
        Self {
            trigger,
            started_at,
            duration_ms: 0,
            zombies_found: 0,
            zombie_pass_skipped: false,
            zombie_removed: Vec::new(),
            capped_removed: Vec::new(),
            total_removed: 0,
            error: None,
        }
    }

    pub fn failed(trigger: RunTrigger, started_at: DateTime<Utc>, error: String) -> Self {
        Self {
            error: Some(error),
            ..Self::new(trigger, started_at)
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }

    pub fn removed_from(&self, table: RetentionTable) -> u64 {
        self.zombie_removed
            .iter()
            .chain(self.capped_removed.iter())
            .filter(|r| r.table == table)
            .map(|r| r.rows)
            .sum()
    }
}

/// Process-local retention counters, mutated only by the retention engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupStats {
    pub last_run: Option<DateTime<Utc>>,
    pub next_run: Option<DateTime<Utc>>,
    pub runs: u64,
    pub total_removed: u64,
    pub last_removed: u64,
    pub errors: u64,
}

impl CleanupStats {
    pub fn record_success(&mut self, report: &CleanupReport) {
        self.runs += 1;
        self.last_run = Some(report.started_at);
        self.last_removed = report.total_removed;
        self.total_removed += report.total_removed;
    }

    pub fn record_failure(&mut self) {
        self.errors += 1;
    }
}

/// Most recent run reports, newest first, bounded to `capacity`.
#[derive(Debug, Clone)]
pub struct CleanupHistory {
    capacity: usize,
    reports: VecDeque<CleanupReport>,
}

impl CleanupHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            reports: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, report: CleanupReport) {
        if self.reports.len() == self.capacity {
            self.reports.pop_back();
        }
        self.reports.push_front(report);
    }

    /// `limit` reports starting `offset` runs back from the newest.
    pub fn page(&self, limit: usize, offset: usize) -> Vec<CleanupReport> {
        self.reports.iter().skip(offset).take(limit).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CleanupHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Current size of a prunable table next to its configured bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableUsage {
    pub table: RetentionTable,
    pub rows: u64,
    pub max_rows: Option<u64>,
    pub enforce_cap: bool,
}

impl TableUsage {
    pub fn is_over_cap(&self) -> bool {
        self.enforce_cap && self.max_rows.is_some_and(|max| self.rows > max)
    }
}
