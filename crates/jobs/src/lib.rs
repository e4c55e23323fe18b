pub mod cache_maintenance;
pub mod retention;
pub mod runner;
pub mod schedule;

pub use cache_maintenance::CacheMaintenanceJob;
pub use retention::RetentionJob;
pub use runner::{JobRunner, RunningJobs};
pub use schedule::{next_run_after, ScheduleZone};
