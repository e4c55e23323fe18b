use gridrank_domain::{CleanupReport, DomainError, RunTrigger};
use std::sync::Arc;
use tracing::info;

use crate::services::RetentionEngine;

pub struct ForceCleanupUseCase {
    engine: Arc<RetentionEngine>,
}

impl ForceCleanupUseCase {
    pub fn new(engine: Arc<RetentionEngine>) -> Self {
        Self { engine }
    }

    /// Runs retention now, ignoring the profile population guard.
    pub async fn execute(&self) -> Result<CleanupReport, DomainError> {
        info!("Forced retention run requested");
        self.engine.run(RunTrigger::Forced).await
    }
}
