use crate::retention::{RetentionPolicy, TablePolicy};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Local time of day the scheduled run fires, `HH:MM`.
    #[serde(default = "default_schedule_time")]
    pub schedule_time: String,

    /// IANA zone name for `schedule_time`; the system zone when unset.
    #[serde(default)]
    pub timezone: Option<String>,

    #[serde(default = "default_inactivity_days")]
    pub inactivity_days: u32,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_batch_pause_ms")]
    pub batch_pause_ms: u64,

    /// Number of past run reports kept for the status view.
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    #[serde(default)]
    pub tables: RetentionTablesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetentionTablesConfig {
    #[serde(default = "default_game_records_policy")]
    pub game_records: TablePolicy,

    /// Its maximum doubles as the population threshold for the zombie pass.
    #[serde(default = "default_player_profiles_policy")]
    pub player_profiles: TablePolicy,

    #[serde(default = "default_share_rewards_policy")]
    pub share_rewards: TablePolicy,
}

impl Default for RetentionTablesConfig {
    fn default() -> Self {
        Self {
            game_records: default_game_records_policy(),
            player_profiles: default_player_profiles_policy(),
            share_rewards: default_share_rewards_policy(),
        }
    }
}

impl RetentionConfig {
    pub fn schedule_time(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.schedule_time, "%H:%M").ok()
    }

    pub fn policy(&self) -> RetentionPolicy {
        RetentionPolicy {
            inactivity: chrono::Duration::days(i64::from(self.inactivity_days)),
            batch_size: self.batch_size.max(1),
            batch_pause: Duration::from_millis(self.batch_pause_ms),
            game_records: self.tables.game_records,
            player_profiles: self.tables.player_profiles,
            share_rewards: self.tables.share_rewards,
        }
    }
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule_time: default_schedule_time(),
            timezone: None,
            inactivity_days: default_inactivity_days(),
            batch_size: default_batch_size(),
            batch_pause_ms: default_batch_pause_ms(),
            history_size: default_history_size(),
            tables: RetentionTablesConfig::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_schedule_time() -> String {
    "02:00".to_string()
}

fn default_inactivity_days() -> u32 {
    15
}

fn default_batch_size() -> usize {
    100
}

fn default_batch_pause_ms() -> u64 {
    50
}

fn default_history_size() -> usize {
    crate::cleanup::DEFAULT_HISTORY_CAPACITY
}

fn default_game_records_policy() -> TablePolicy {
    RetentionPolicy::default().game_records
}

fn default_player_profiles_policy() -> TablePolicy {
    RetentionPolicy::default().player_profiles
}

fn default_share_rewards_policy() -> TablePolicy {
    RetentionPolicy::default().share_rewards
}
