pub mod cache;
pub mod database;
pub mod errors;
pub mod leaderboard;
pub mod logging;
pub mod retention;
pub mod root;

pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use errors::ConfigError;
pub use leaderboard::LeaderboardConfig;
pub use logging::LoggingConfig;
pub use retention::{RetentionConfig, RetentionTablesConfig};
pub use root::{CliOverrides, Config};
