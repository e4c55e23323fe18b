mod cache_maintenance_port;
mod record_store;

pub use cache_maintenance_port::{CacheMaintenancePort, CacheSweepOutcome};
pub use record_store::{DeletePredicate, RankPredicate, RecordStore, RecordTransaction};
