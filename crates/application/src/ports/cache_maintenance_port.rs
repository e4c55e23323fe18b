use async_trait::async_trait;
use gridrank_domain::DomainError;

/// Outcome of a cache sweep cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheSweepOutcome {
    pub expired_removed: usize,
    pub evicted: usize,
    pub cache_size: usize,
}

impl CacheSweepOutcome {
    pub fn entries_removed(&self) -> usize {
        self.expired_removed + self.evicted
    }
}

/// Port for periodic rank cache maintenance.
#[async_trait]
pub trait CacheMaintenancePort: Send + Sync {
    /// Drop expired entries, then shed the oldest half when over capacity.
    async fn run_sweep_cycle(&self) -> Result<CacheSweepOutcome, DomainError>;
}
