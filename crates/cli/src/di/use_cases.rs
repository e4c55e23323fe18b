use super::{Repositories, Services};
use gridrank_application::use_cases::{
    ClearCachesUseCase, ForceCleanupUseCase, GetCacheStatsUseCase, GetCleanupStatusUseCase,
    GetPlayerRankUseCase, GetTopNUseCase, RecordScoreUseCase,
};
use std::sync::Arc;

#[allow(dead_code)]
pub struct UseCases {
    pub record_score: Arc<RecordScoreUseCase>,
    pub get_top_n: Arc<GetTopNUseCase>,
    pub get_player_rank: Arc<GetPlayerRankUseCase>,
    pub force_cleanup: Arc<ForceCleanupUseCase>,
    pub get_cleanup_status: Arc<GetCleanupStatusUseCase>,
    pub clear_caches: Arc<ClearCachesUseCase>,
    pub get_cache_stats: Arc<GetCacheStatsUseCase>,
}

impl UseCases {
    pub fn new(repos: &Repositories, services: &Services) -> Self {
        Self {
            record_score: Arc::new(RecordScoreUseCase::new(
                repos.records.clone(),
                services.rank_store.clone(),
                services.cache.clone(),
            )),
            get_top_n: Arc::new(GetTopNUseCase::new(
                repos.records.clone(),
                services.rank_store.clone(),
                services.cache.clone(),
            )),
            get_player_rank: Arc::new(GetPlayerRankUseCase::new(services.rank_store.clone())),
            force_cleanup: Arc::new(ForceCleanupUseCase::new(services.retention.clone())),
            get_cleanup_status: Arc::new(GetCleanupStatusUseCase::new(services.retention.clone())),
            clear_caches: Arc::new(ClearCachesUseCase::new(
                services.rank_store.clone(),
                services.cache.clone(),
            )),
            get_cache_stats: Arc::new(GetCacheStatsUseCase::new(services.cache.clone())),
        }
    }
}
