//! gridrank domain layer
pub mod category;
pub mod cleanup;
pub mod config;
pub mod errors;
pub mod game_record;
pub mod rank;
pub mod retention;

pub use category::{CategoryKey, CategoryRule, CategoryRules, RankDirection, RankField, RankKey, SecondaryRank};
pub use cleanup::{
    CleanupHistory, CleanupReport, CleanupStats, RunTrigger, TableRemoval, TableUsage,
    DEFAULT_HISTORY_CAPACITY,
};
pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use game_record::{GameRecord, ScoreOutcome, ScoreSubmission};
pub use rank::{PlayerRank, RankEntry};
pub use retention::{RetentionPolicy, RetentionTable, TablePolicy, Watermark};
