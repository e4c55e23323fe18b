use crate::di::{Services, UseCases};
use gridrank_application::ports::CacheMaintenancePort;
use gridrank_domain::{CategoryKey, Config, RankField, ScoreSubmission};
use gridrank_jobs::{CacheMaintenanceJob, JobRunner, RetentionJob, ScheduleZone};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(60);

pub struct Submission {
    pub player_id: String,
    pub game_type: i32,
    pub sub_type: i32,
    pub score: f64,
    pub play_time: f64,
    pub nick_name: Option<String>,
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(config: &Config, services: &Services) -> anyhow::Result<()> {
    let shutdown = CancellationToken::new();

    let maintenance: Arc<dyn CacheMaintenancePort> = services.cache.clone();
    let mut runner = JobRunner::new()
        .with_cache_maintenance(
            CacheMaintenanceJob::new(maintenance).with_interval(config.cache.sweep_interval_secs),
        )
        .with_shutdown_token(shutdown.clone());

    if config.retention.enabled {
        let at = config.retention.schedule_time().ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid retention schedule time '{}'",
                config.retention.schedule_time
            )
        })?;
        let zone = ScheduleZone::parse(config.retention.timezone.as_deref())?;
        runner = runner
            .with_retention(RetentionJob::new(services.retention.clone(), at).with_zone(zone));
    } else {
        warn!("Retention is disabled, tables will grow without bound");
    }

    let jobs = runner.start().await;
    info!("gridrank running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!(jobs = ?jobs.names(), "Shutdown requested, waiting for background jobs");
    shutdown.cancel();

    let aborted = jobs.wait(SHUTDOWN_GRACE).await;
    if !aborted.is_empty() {
        warn!(jobs = ?aborted, "Background jobs aborted at shutdown");
    }

    info!("Shutdown complete");
    Ok(())
}

pub async fn cleanup(use_cases: &UseCases) -> anyhow::Result<()> {
    let report = use_cases.force_cleanup.execute().await?;
    print_json(&report)
}

pub async fn status(use_cases: &UseCases, limit: usize, offset: usize) -> anyhow::Result<()> {
    let tables = use_cases.get_cleanup_status.table_usage().await?;
    let cleanup = use_cases.get_cleanup_status.execute().await;
    let history = use_cases.get_cleanup_status.history(limit, offset).await;
    let cache = use_cases.get_cache_stats.execute();

    let over_cap: Vec<_> = tables
        .iter()
        .filter(|t| t.is_over_cap())
        .map(|t| t.table)
        .collect();

    print_json(&serde_json::json!({
        "tables": tables,
        "over_cap": over_cap,
        "cleanup": cleanup,
        "history": history,
        "cache": cache,
    }))
}

pub async fn top(
    use_cases: &UseCases,
    game_type: i32,
    sub_type: i32,
    field: RankField,
) -> anyhow::Result<()> {
    let category = CategoryKey::new(game_type, sub_type);
    let entries = use_cases.get_top_n.execute_field(category, field).await?;
    print_json(&entries)
}

pub async fn rank(
    use_cases: &UseCases,
    player_id: &str,
    game_type: i32,
    sub_type: i32,
    field: RankField,
) -> anyhow::Result<()> {
    let category = CategoryKey::new(game_type, sub_type);
    match use_cases
        .get_player_rank
        .execute_field(category, field, player_id)
        .await?
    {
        Some(position) => print_json(&position),
        None => anyhow::bail!("Player {} has no record in category {}", player_id, category),
    }
}

pub async fn submit(use_cases: &UseCases, submission: Submission) -> anyhow::Result<()> {
    let category = CategoryKey::new(submission.game_type, submission.sub_type);
    let mut request = ScoreSubmission::new(submission.player_id, category, submission.score)
        .with_play_time(submission.play_time);
    request.nick_name = submission.nick_name.map(Into::into);

    let outcome = use_cases.record_score.execute(request).await?;
    print_json(&outcome)
}
