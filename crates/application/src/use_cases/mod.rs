pub mod cache;
pub mod leaderboard;
pub mod retention;

// Re-export use cases
pub use cache::{ClearCachesUseCase, GetCacheStatsUseCase};
pub use leaderboard::{GetPlayerRankUseCase, GetTopNUseCase, RecordScoreUseCase};
pub use retention::{ForceCleanupUseCase, GetCleanupStatusUseCase};
