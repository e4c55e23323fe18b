use crate::category::{CategoryKey, RankDirection, RankField};
use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One persisted row per (player, game_type, sub_type).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Storage surrogate key; `None` until persisted.
    pub id: Option<i64>,
    pub player_id: Arc<str>,
    pub category: CategoryKey,
    pub score: f64,
    /// Accumulated play duration in seconds.
    pub play_time: f64,
    pub nick_name: Arc<str>,
    pub avatar_url: Arc<str>,
    pub record_time: DateTime<Utc>,
}

impl GameRecord {
    pub fn value(&self, field: RankField) -> f64 {
        match field {
            RankField::Score => self.score,
            RankField::PlayTime => self.play_time,
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.player_id.trim().is_empty() {
            return Err(DomainError::InvalidRecord("missing player id".to_string()));
        }
        if !self.score.is_finite() {
            return Err(DomainError::InvalidRecord(format!(
                "score is not a finite number for player {}",
                self.player_id
            )));
        }
        if !self.play_time.is_finite() || self.play_time < 0.0 {
            return Err(DomainError::InvalidRecord(format!(
                "invalid play time {} for player {}",
                self.play_time, self.player_id
            )));
        }
        Ok(())
    }
}

/// A score submitted by the request layer.
///
/// `score` is optional because the request layer forwards whatever the
/// client sent; a submission without one is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub player_id: Arc<str>,
    pub category: CategoryKey,
    pub score: Option<f64>,
    #[serde(default)]
    pub add_play_time: f64,
    #[serde(default)]
    pub nick_name: Option<Arc<str>>,
    #[serde(default)]
    pub avatar_url: Option<Arc<str>>,
}

impl ScoreSubmission {
    pub fn new(player_id: impl Into<Arc<str>>, category: CategoryKey, score: f64) -> Self {
        Self {
            player_id: player_id.into(),
            category,
            score: Some(score),
            add_play_time: 0.0,
            nick_name: None,
            avatar_url: None,
        }
    }

    pub fn with_play_time(mut self, seconds: f64) -> Self {
        self.add_play_time = seconds;
        self
    }

    pub fn with_profile(mut self, nick_name: &str, avatar_url: &str) -> Self {
        self.nick_name = Some(nick_name.into());
        self.avatar_url = Some(avatar_url.into());
        self
    }

    pub fn validate(&self) -> Result<f64, DomainError> {
        if self.player_id.trim().is_empty() {
            return Err(DomainError::InvalidRecord("missing player id".to_string()));
        }
        let score = self
            .score
            .ok_or_else(|| DomainError::InvalidRecord("missing score".to_string()))?;
        if !score.is_finite() {
            return Err(DomainError::InvalidRecord(format!(
                "score is not a finite number: {score}"
            )));
        }
        if !self.add_play_time.is_finite() || self.add_play_time < 0.0 {
            return Err(DomainError::InvalidRecord(format!(
                "invalid play time increment: {}",
                self.add_play_time
            )));
        }
        Ok(score)
    }

    /// Folds this submission into the player's stored record.
    ///
    /// The stored score only moves when the new one is strictly better for
    /// the category; play time accumulates and display fields always follow
    /// the latest submission. Returns the merged record and whether the
    /// personal best changed.
    pub fn merge_into(
        &self,
        existing: Option<&GameRecord>,
        direction: RankDirection,
        now: DateTime<Utc>,
    ) -> Result<(GameRecord, bool), DomainError> {
        let score = self.validate()?;

        let merged = match existing {
            Some(current) => {
                let improved = direction.is_strictly_better(score, current.score);
                let record = GameRecord {
                    id: current.id,
                    player_id: current.player_id.clone(),
                    category: current.category,
                    score: if improved { score } else { current.score },
                    play_time: current.play_time + self.add_play_time,
                    nick_name: self
                        .nick_name
                        .clone()
                        .unwrap_or_else(|| current.nick_name.clone()),
                    avatar_url: self
                        .avatar_url
                        .clone()
                        .unwrap_or_else(|| current.avatar_url.clone()),
                    record_time: now,
                };
                (record, improved)
            }
            None => {
                let record = GameRecord {
                    id: None,
                    player_id: self.player_id.clone(),
                    category: self.category,
                    score,
                    play_time: self.add_play_time,
                    nick_name: self.nick_name.clone().unwrap_or_else(|| Arc::from("")),
                    avatar_url: self.avatar_url.clone().unwrap_or_else(|| Arc::from("")),
                    record_time: now,
                };
                (record, true)
            }
        };

        Ok(merged)
    }
}

/// Result of `recordScore`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// The submission changed the player's persisted best score.
    pub updated: bool,
    /// Absolute rank after the update; only present when `updated`.
    pub new_rank: Option<u64>,
}
