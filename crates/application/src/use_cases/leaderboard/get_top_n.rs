use gridrank_domain::{CategoryKey, DomainError, RankEntry, RankField, RankKey};
use std::sync::Arc;
use tracing::debug;

use crate::ports::RecordStore;
use crate::services::{RankCache, RankPayload, RankStore};

const HYDRATE_ATTEMPTS: u32 = 3;

pub struct GetTopNUseCase {
    records: Arc<dyn RecordStore>,
    rank_store: Arc<RankStore>,
    cache: Arc<RankCache>,
}

impl GetTopNUseCase {
    pub fn new(
        records: Arc<dyn RecordStore>,
        rank_store: Arc<RankStore>,
        cache: Arc<RankCache>,
    ) -> Self {
        Self {
            records,
            rank_store,
            cache,
        }
    }

    pub async fn execute(&self, category: CategoryKey) -> Result<RankPayload, DomainError> {
        self.execute_field(category, RankField::Score).await
    }

    /// Cache, then a fresh hydrated view, then storage.
    ///
    /// Rows fetched while a write to the same view lands are thrown away and
    /// fetched again, so a completed write is never hidden behind a freshly
    /// stamped view.
    pub async fn execute_field(
        &self,
        category: CategoryKey,
        field: RankField,
    ) -> Result<RankPayload, DomainError> {
        let key = RankKey::new(category, field);
        if !self.rank_store.rules().has_view(key) {
            return Err(DomainError::InvalidCategory(format!(
                "category {} has no {} ranking",
                category,
                field.as_str()
            )));
        }

        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        if self.rank_store.is_fresh(key) {
            let seen = self.rank_store.write_version(key);
            if let Some(entries) = self.rank_store.top_n(key) {
                let payload: RankPayload = entries.into();
                if self.rank_store.write_version(key) == seen {
                    self.cache.put(key, payload.clone());
                }
                return Ok(payload);
            }
        }

        let direction = self.rank_store.direction(key);
        let capacity = self.rank_store.capacity();
        let mut rows = Vec::new();
        for attempt in 1..=HYDRATE_ATTEMPTS {
            let seen = self.rank_store.write_version(key);
            rows = self
                .records
                .find_top_ordered(category, field, direction, capacity)
                .await?;

            if self.rank_store.hydrate_if_unchanged(key, &rows, seen) {
                let payload: RankPayload = self.rank_store.top_n(key).unwrap_or_default().into();
                if self.rank_store.write_version(key) == seen {
                    self.cache.put(key, payload.clone());
                }
                debug!(
                    view = %key,
                    entries = payload.len(),
                    attempt,
                    "Rank view loaded from storage"
                );
                return Ok(payload);
            }
        }

        // Writes kept racing the query: answer from the last rows but leave
        // the view and the cache for the next read.
        debug!(view = %key, "Serving uncached rows after repeated write races");
        Ok(rows
            .iter()
            .take(capacity)
            .map(RankEntry::from)
            .collect::<Vec<_>>()
            .into())
    }
}
