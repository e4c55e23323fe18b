use crate::category::{CategoryRule, CategoryRules, RankDirection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LeaderboardConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Age after which a hydrated view is pulled from storage again.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    #[serde(default = "default_categories")]
    pub categories: Vec<CategoryRule>,
}

impl LeaderboardConfig {
    pub fn rules(&self) -> CategoryRules {
        CategoryRules::new(self.categories.clone())
    }
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            refresh_interval_secs: default_refresh_interval_secs(),
            categories: default_categories(),
        }
    }
}

fn default_top_n() -> usize {
    100
}

fn default_refresh_interval_secs() -> u64 {
    300
}

fn default_categories() -> Vec<CategoryRule> {
    vec![CategoryRule {
        game_type: 1001,
        sub_type: None,
        direction: RankDirection::Ascending,
        secondary: None,
    }]
}
