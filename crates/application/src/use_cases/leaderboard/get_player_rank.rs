use gridrank_domain::{CategoryKey, DomainError, PlayerRank, RankField, RankKey};
use std::sync::Arc;

use crate::services::RankStore;

pub struct GetPlayerRankUseCase {
    rank_store: Arc<RankStore>,
}

impl GetPlayerRankUseCase {
    pub fn new(rank_store: Arc<RankStore>) -> Self {
        Self { rank_store }
    }

    pub async fn execute(
        &self,
        category: CategoryKey,
        player_id: &str,
    ) -> Result<Option<PlayerRank>, DomainError> {
        self.execute_field(category, RankField::Score, player_id).await
    }

    pub async fn execute_field(
        &self,
        category: CategoryKey,
        field: RankField,
        player_id: &str,
    ) -> Result<Option<PlayerRank>, DomainError> {
        let key = RankKey::new(category, field);
        if !self.rank_store.rules().has_view(key) {
            return Err(DomainError::InvalidCategory(format!(
                "category {} has no {} ranking",
                category,
                field.as_str()
            )));
        }
        self.rank_store.rank_of(key, player_id).await
    }
}
