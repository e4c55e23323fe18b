use chrono::Utc;
use gridrank_domain::{DomainError, RankKey, ScoreOutcome, ScoreSubmission};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::ports::RecordStore;
use crate::services::{RankCache, RankStore};

pub struct RecordScoreUseCase {
    records: Arc<dyn RecordStore>,
    rank_store: Arc<RankStore>,
    cache: Arc<RankCache>,
}

impl RecordScoreUseCase {
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

    /// Persists the submission and repositions the player in every hydrated
    /// view of the category.
    ///
    /// The stored score only moves when the submission beats the player's
    /// personal best; `new_rank` is reported for that case only, and is
    /// left empty when the rank count cannot be read after a successful save.
    #[instrument(skip(self, submission), fields(player = %submission.player_id, category = %submission.category))]
    pub async fn execute(&self, submission: ScoreSubmission) -> Result<ScoreOutcome, DomainError> {
        if let Err(e) = submission.validate() {
            warn!(error = %e, "Rejected score submission");
            return Err(e);
        }

        let primary = RankKey::primary(submission.category);
        let direction = self.rank_store.direction(primary);

        let existing = self
            .records
            .find_record(submission.category, &submission.player_id)
            .await?;
        let (merged, improved) = submission.merge_into(existing.as_ref(), direction, Utc::now())?;

        let saved = self.records.save_record(&merged).await?;
        let view_changed = self.rank_store.upsert(&saved);

        for (key, _) in self.rank_store.rules().views(saved.category) {
            self.cache.invalidate(&key);
        }

        // Already committed: a failed rank lookup must not fail the call.
        let new_rank = if improved {
            match self.rank_store.rank_of(primary, &saved.player_id).await {
                Ok(rank) => rank.map(|r| r.rank),
                Err(e) => {
                    warn!(error = %e, "Score saved but rank lookup failed");
                    None
                }
            }
        } else {
            None
        };

        debug!(improved, view_changed, ?new_rank, "Score recorded");
        Ok(ScoreOutcome {
            updated: improved,
            new_rank,
        })
    }
}
