use gridrank_domain::{CleanupReport, CleanupStats, DomainError, TableUsage};
use std::sync::Arc;

use crate::services::RetentionEngine;

pub struct GetCleanupStatusUseCase {
    engine: Arc<RetentionEngine>,
}

impl GetCleanupStatusUseCase {
    pub fn new(engine: Arc<RetentionEngine>) -> Self {
        Self { engine }
    }

    pub async fn execute(&self) -> CleanupStats {
        self.engine.stats().await
    }

    /// Paginated run history, newest first.
    pub async fn history(&self, limit: usize, offset: usize) -> Vec<CleanupReport> {
        self.engine.history(limit, offset).await
    }

    pub async fn table_usage(&self) -> Result<Vec<TableUsage>, DomainError> {
        self.engine.table_usage().await
    }
}
