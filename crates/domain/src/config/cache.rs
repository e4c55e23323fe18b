use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Lifetime of a materialized rank list.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Entry count above which a sweep drops the oldest half.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_ttl_secs() -> u64 {
    30
}

fn default_max_entries() -> usize {
    1_000
}

fn default_sweep_interval_secs() -> u64 {
    120
}
