#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use gridrank_infrastructure::database::MIGRATOR;
use gridrank_infrastructure::repositories::record_store::format_timestamp;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

pub async fn insert_record(
    pool: &SqlitePool,
    player_id: &str,
    game_type: i32,
    score: f64,
    at: DateTime<Utc>,
) {
    sqlx::query(
        "INSERT INTO game_records (player_id, game_type, sub_type, score, play_time, record_time)
         VALUES (?, ?, 0, ?, 0, ?)",
    )
    .bind(player_id)
    .bind(game_type)
    .bind(score)
    .bind(format_timestamp(at))
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_profile(pool: &SqlitePool, player_id: &str, at: DateTime<Utc>) {
    let ts = format_timestamp(at);
    sqlx::query(
        "INSERT INTO player_profiles (player_id, created_at, updated_at) VALUES (?, ?, ?)",
    )
    .bind(player_id)
    .bind(&ts)
    .bind(&ts)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn insert_reward(pool: &SqlitePool, player_id: &str, at: DateTime<Utc>) {
    let ts = format_timestamp(at);
    sqlx::query(
        "INSERT INTO share_rewards (player_id, share_time, share_count, created_at, updated_at)
         VALUES (?, ?, 1, ?, ?)",
    )
    .bind(player_id)
    .bind(&ts)
    .bind(&ts)
    .bind(&ts)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

pub async fn player_ids(pool: &SqlitePool, table: &str) -> Vec<String> {
    sqlx::query_scalar(&format!("SELECT player_id FROM {table} ORDER BY player_id"))
        .fetch_all(pool)
        .await
        .unwrap()
}
