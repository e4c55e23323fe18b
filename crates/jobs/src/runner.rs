use crate::{CacheMaintenanceJob, RetentionJob};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

pub trait SpawnableJob: Send + Sync + 'static {
    const NAME: &'static str;

    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> impl Future<Output = JoinHandle<()>> + Send;
}

macro_rules! impl_spawnable_job {
    ($t:ty, $name:literal) => {
        impl SpawnableJob for $t {
            const NAME: &'static str = $name;

            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> impl Future<Output = JoinHandle<()>> + Send {
                self.start()
            }
        }
    };
}

impl_spawnable_job!(RetentionJob, "retention");
impl_spawnable_job!(CacheMaintenanceJob, "cache_maintenance");

async fn spawn_job<J: SpawnableJob>(
    job: Option<J>,
    shutdown: &Option<CancellationToken>,
    running: &mut Vec<(&'static str, JoinHandle<()>)>,
) {
    if let Some(job) = job {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        running.push((J::NAME, Arc::new(job).start_job().await));
    }
}

pub struct JobRunner {
    retention: Option<RetentionJob>,
    cache_maintenance: Option<CacheMaintenanceJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            retention: None,
            cache_maintenance: None,
            shutdown: None,
        }
    }

    pub fn with_retention(mut self, job: RetentionJob) -> Self {
        self.retention = Some(job);
        self
    }

    pub fn with_cache_maintenance(mut self, job: CacheMaintenanceJob) -> Self {
        self.cache_maintenance = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    pub async fn start(self) -> RunningJobs {
        info!("Starting background job runner");

        let mut handles = Vec::new();
        spawn_job(self.retention, &self.shutdown, &mut handles).await;
        spawn_job(self.cache_maintenance, &self.shutdown, &mut handles).await;

        info!(jobs = handles.len(), "All background jobs started");
        RunningJobs { handles }
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Join handles of the jobs a [`JobRunner`] spawned.
///
/// Dropping it detaches the jobs; they keep running until their
/// cancellation token fires.
pub struct RunningJobs {
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl RunningJobs {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handles.iter().map(|(name, _)| *name).collect()
    }

    /// Waits up to `grace` for every job loop to exit, then aborts the rest.
    ///
    /// Call after cancelling the shutdown token. A retention run already in
    /// progress is allowed to finish within the grace period. Returns the
    /// names of the jobs that had to be aborted.
    pub async fn wait(self, grace: Duration) -> Vec<&'static str> {
        let deadline = Instant::now() + grace;
        let mut aborted = Vec::new();

        for (name, mut handle) in self.handles {
            match tokio::time::timeout_at(deadline, &mut handle).await {
                Ok(Ok(())) => debug!(job = name, "Background job stopped"),
                Ok(Err(e)) => error!(job = name, error = %e, "Background job ended abnormally"),
                Err(_) => {
                    warn!(
                        job = name,
                        grace_secs = grace.as_secs(),
                        "Background job did not stop in time, aborting"
                    );
                    handle.abort();
                    aborted.push(name);
                }
            }
        }

        aborted
    }
}
