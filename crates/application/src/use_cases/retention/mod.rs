pub mod force_cleanup;
pub mod get_status;

pub use force_cleanup::ForceCleanupUseCase;
pub use get_status::GetCleanupStatusUseCase;
