use super::Repositories;
use gridrank_application::services::{RankCache, RankStore, RetentionEngine};
use gridrank_domain::Config;
use std::sync::Arc;
use std::time::Duration;

/// Shared in-memory state, built once and handed to every consumer.
pub struct Services {
    pub rank_store: Arc<RankStore>,
    pub cache: Arc<RankCache>,
    pub retention: Arc<RetentionEngine>,
}

impl Services {
    pub fn new(config: &Config, repos: &Repositories) -> Self {
        let rank_store = Arc::new(RankStore::new(
            repos.records.clone(),
            config.leaderboard.rules(),
            config.leaderboard.top_n,
            Duration::from_secs(config.leaderboard.refresh_interval_secs),
        ));
        let cache = Arc::new(RankCache::new(
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_entries,
        ));
        let retention = Arc::new(RetentionEngine::new(
            repos.records.clone(),
            rank_store.clone(),
            cache.clone(),
            config.retention.policy(),
        )
        .with_history_capacity(config.retention.history_size));

        Self {
            rank_store,
            cache,
            retention,
        }
    }
}
