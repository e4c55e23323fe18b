use chrono::{DateTime, NaiveTime, Utc};
use gridrank_application::services::RetentionEngine;
use gridrank_domain::RunTrigger;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::schedule::ScheduleZone;

/// Fires the retention engine once a day at a local time of day.
///
/// The next fire time is recomputed from the wall clock before every wait,
/// so clock changes and DST shifts are picked up on the following cycle.
pub struct RetentionJob {
    engine: Arc<RetentionEngine>,
    at: NaiveTime,
    zone: ScheduleZone,
    shutdown: CancellationToken,
}

impl RetentionJob {
    pub fn new(engine: Arc<RetentionEngine>, at: NaiveTime) -> Self {
        Self {
            engine,
            at,
            zone: ScheduleZone::Local,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_zone(mut self, zone: ScheduleZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn next_fire(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.zone.next_fire(after, self.at)
    }

    pub async fn start(self: Arc<Self>) -> JoinHandle<()> {
        info!(
            at = %self.at.format("%H:%M"),
            zone = %self.zone,
            "Starting retention scheduler"
        );

        tokio::spawn(async move {
            let mut last_fire: Option<DateTime<Utc>> = None;
            loop {
                let now = Utc::now();
                let from = last_fire.map_or(now, |fired| fired.max(now));
                let Some(next) = self.next_fire(from) else {
                    error!(at = %self.at, "Could not compute next retention run, stopping scheduler");
                    break;
                };
                self.engine.set_next_run(Some(next)).await;
                info!(next_run = %next, "Next retention run scheduled");

                let wait = (next - now).to_std().unwrap_or_default();
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!("RetentionJob: shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(wait) => {}
                }
                last_fire = Some(next);

                if let Err(e) = self.engine.run(RunTrigger::Scheduled).await {
                    warn!(error = %e, "Scheduled retention run failed, retrying next cycle");
                }
            }
            self.engine.set_next_run(None).await;
        })
    }
}
