use crate::category::RankField;
use crate::game_record::GameRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Read-only projection of a `GameRecord` held inside a bounded ranked view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub player_id: Arc<str>,
    pub score: f64,
    pub play_time: f64,
    pub nick_name: Arc<str>,
    pub avatar_url: Arc<str>,
    pub record_time: DateTime<Utc>,
}

impl RankEntry {
    #[inline]
    pub fn value(&self, field: RankField) -> f64 {
        match field {
            RankField::Score => self.score,
            RankField::PlayTime => self.play_time,
        }
    }
}

impl From<&GameRecord> for RankEntry {
    fn from(record: &GameRecord) -> Self {
        Self {
            player_id: record.player_id.clone(),
            score: record.score,
            play_time: record.play_time,
            nick_name: record.nick_name.clone(),
            avatar_url: record.avatar_url.clone(),
            record_time: record.record_time,
        }
    }
}

/// A player's absolute position on a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRank {
    pub player_id: Arc<str>,
    pub score: f64,
    pub rank: u64,
}
