mod rank_cache;
mod rank_store;
mod retention_engine;

pub use rank_cache::{CacheStats, RankCache, RankPayload};
pub use rank_store::RankStore;
pub use retention_engine::RetentionEngine;
