use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Logical tables the retention engine is allowed to prune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionTable {
    GameRecords,
    PlayerProfiles,
    ShareRewards,
}

impl RetentionTable {
    pub const ALL: [RetentionTable; 3] = [
        RetentionTable::GameRecords,
        RetentionTable::PlayerProfiles,
        RetentionTable::ShareRewards,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            RetentionTable::GameRecords => "game_records",
            RetentionTable::PlayerProfiles => "player_profiles",
            RetentionTable::ShareRewards => "share_rewards",
        }
    }

    /// Column that orders rows oldest-first when a table is capped.
    pub fn age_column(self) -> &'static str {
        match self {
            RetentionTable::GameRecords => "record_time",
            RetentionTable::PlayerProfiles | RetentionTable::ShareRewards => "updated_at",
        }
    }
}

impl fmt::Display for RetentionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePolicy {
    pub max_rows: Option<u64>,
    /// When false the maximum is only consulted (zombie guard), never enforced.
    pub enforce_cap: bool,
}

impl TablePolicy {
    pub fn is_exceeded_by(&self, current: u64) -> bool {
        self.max_rows.is_some_and(|max| current > max)
    }

    pub fn cap(&self) -> Option<u64> {
        if self.enforce_cap {
            self.max_rows
        } else {
            None
        }
    }
}

/// Retention bounds evaluated fresh on every engine run.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    pub inactivity: chrono::Duration,
    pub batch_size: usize,
    pub batch_pause: Duration,
    pub game_records: TablePolicy,
    pub player_profiles: TablePolicy,
    pub share_rewards: TablePolicy,
}

impl RetentionPolicy {
    pub fn table(&self, table: RetentionTable) -> &TablePolicy {
        match table {
            RetentionTable::GameRecords => &self.game_records,
            RetentionTable::PlayerProfiles => &self.player_profiles,
            RetentionTable::ShareRewards => &self.share_rewards,
        }
    }

    pub fn inactivity_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.inactivity
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self {
            inactivity: chrono::Duration::days(15),
            batch_size: 100,
            batch_pause: Duration::from_millis(50),
            game_records: TablePolicy {
                max_rows: Some(50_000),
                enforce_cap: true,
            },
            player_profiles: TablePolicy {
                max_rows: Some(10_000),
                enforce_cap: false,
            },
            share_rewards: TablePolicy {
                max_rows: Some(10_000),
                enforce_cap: false,
            },
        }
    }
}

/// Oldest surviving row of a capped table; everything strictly older goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
}
