#![allow(dead_code)]
use chrono::{DateTime, Duration, Utc};
use gridrank_domain::{CategoryKey, GameRecord};
use std::sync::Arc;

pub struct GameRecordBuilder {
    player_id: Arc<str>,
    category: CategoryKey,
    score: f64,
    play_time: f64,
    nick_name: Arc<str>,
    record_time: DateTime<Utc>,
}

impl GameRecordBuilder {
    pub fn new(player_id: &str) -> Self {
        Self {
            player_id: player_id.into(),
            category: CategoryKey::new(1002, 0),
            score: 0.0,
            play_time: 0.0,
            nick_name: "player".into(),
            record_time: Utc::now(),
        }
    }

    pub fn category(mut self, game_type: i32, sub_type: i32) -> Self {
        self.category = CategoryKey::new(game_type, sub_type);
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn play_time(mut self, seconds: f64) -> Self {
        self.play_time = seconds;
        self
    }

    pub fn days_ago(mut self, days: i64) -> Self {
        self.record_time = Utc::now() - Duration::days(days);
        self
    }

    pub fn build(self) -> GameRecord {
        GameRecord {
            id: Some(1),
            player_id: self.player_id,
            category: self.category,
            score: self.score,
            play_time: self.play_time,
            nick_name: self.nick_name,
            avatar_url: "https://cdn.example.com/a.png".into(),
            record_time: self.record_time,
        }
    }
}
