#![allow(dead_code)]

use gridrank_application::ports::RecordStore;
use gridrank_application::services::{RankCache, RankStore, RetentionEngine};
use gridrank_domain::{
    CategoryKey, CategoryRule, CategoryRules, RankDirection, RankField, RetentionPolicy,
    SecondaryRank,
};
use std::sync::Arc;
use std::time::Duration;

use super::MockRecordStore;

pub const TIME_ATTACK: CategoryKey = CategoryKey::new(1001, 0);
pub const ENDLESS: CategoryKey = CategoryKey::new(1002, 0);

/// Time attack ranks ascending; endless ranks by score and by play time.
pub fn rules() -> CategoryRules {
    CategoryRules::new(vec![
        CategoryRule {
            game_type: 1001,
            sub_type: None,
            direction: RankDirection::Ascending,
            secondary: None,
        },
        CategoryRule {
            game_type: 1002,
            sub_type: None,
            direction: RankDirection::Descending,
            secondary: Some(SecondaryRank {
                field: RankField::PlayTime,
                direction: RankDirection::Descending,
            }),
        },
    ])
}

pub struct Harness {
    pub store: MockRecordStore,
    pub rank_store: Arc<RankStore>,
    pub cache: Arc<RankCache>,
}

impl Harness {
    pub fn new(capacity: usize) -> Self {
        let store = MockRecordStore::new();
        let records: Arc<dyn RecordStore> = Arc::new(store.clone());
        Self {
            rank_store: Arc::new(RankStore::new(
                records,
                rules(),
                capacity,
                Duration::from_secs(300),
            )),
            cache: Arc::new(RankCache::new(Duration::from_secs(30), 1_000)),
            store,
        }
    }

    pub fn records(&self) -> Arc<dyn RecordStore> {
        Arc::new(self.store.clone())
    }

    pub fn engine(&self, policy: RetentionPolicy) -> Arc<RetentionEngine> {
        Arc::new(RetentionEngine::new(
            self.records(),
            self.rank_store.clone(),
            self.cache.clone(),
            policy,
        ))
    }
}

pub fn fast_policy() -> RetentionPolicy {
    RetentionPolicy {
        batch_pause: Duration::from_millis(1),
        ..RetentionPolicy::default()
    }
}
