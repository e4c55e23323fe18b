use std::sync::Arc;
use tracing::info;

use crate::services::{RankCache, RankStore};

pub struct ClearCachesUseCase {
    rank_store: Arc<RankStore>,
    cache: Arc<RankCache>,
}

impl ClearCachesUseCase {
    pub fn new(rank_store: Arc<RankStore>, cache: Arc<RankCache>) -> Self {
        Self { rank_store, cache }
    }

    /// Drops all rank views and cached lists; returns how many were held.
    pub fn execute(&self) -> usize {
        let views = self.rank_store.clear();
        let entries = self.cache.clear();
        info!(views, entries, "Rank caches cleared");
        views + entries
    }
}
