use std::sync::Arc;

use crate::services::{CacheStats, RankCache};

pub struct GetCacheStatsUseCase {
    cache: Arc<RankCache>,
}

impl GetCacheStatsUseCase {
    pub fn new(cache: Arc<RankCache>) -> Self {
        Self { cache }
    }

    pub fn execute(&self) -> CacheStats {
        self.cache.stats()
    }
}
