pub mod clear_caches;
pub mod get_stats;

pub use clear_caches::ClearCachesUseCase;
pub use get_stats::GetCacheStatsUseCase;
