use super::helpers::format_timestamp;
use gridrank_domain::{DomainError, GameRecord};
use sqlx::{Row, SqlitePool};
use tracing::{debug, error, instrument};

/// Upserts the record on its natural key and mirrors the display fields
/// into the player's profile, both in one transaction.
#[instrument(skip(pool, record), fields(player = %record.player_id, category = %record.category))]
pub(super) async fn save_record(
    pool: &SqlitePool,
    record: &GameRecord,
) -> Result<GameRecord, DomainError> {
    let db_err = |e: sqlx::Error| {
        error!(error = %e, "Failed to save game record");
        DomainError::DatabaseError(e.to_string())
    };

    let record_time = format_timestamp(record.record_time);
    let mut tx = pool.begin().await.map_err(db_err)?;

    let row = sqlx::query(
        "INSERT INTO game_records
            (player_id, game_type, sub_type, score, play_time, nick_name, avatar_url, record_time)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(player_id, game_type, sub_type) DO UPDATE SET
            score = excluded.score,
            play_time = excluded.play_time,
            nick_name = excluded.nick_name,
            avatar_url = excluded.avatar_url,
            record_time = excluded.record_time
         RETURNING id",
    )
    .bind(record.player_id.as_ref())
    .bind(record.category.game_type)
    .bind(record.category.sub_type)
    .bind(record.score)
    .bind(record.play_time)
    .bind(record.nick_name.as_ref())
    .bind(record.avatar_url.as_ref())
    .bind(&record_time)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;
    let id: i64 = row.get("id");

    sqlx::query(
        "INSERT INTO player_profiles (player_id, nick_name, avatar_url, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(player_id) DO UPDATE SET
            nick_name = excluded.nick_name,
            avatar_url = excluded.avatar_url,
            updated_at = excluded.updated_at",
    )
    .bind(record.player_id.as_ref())
    .bind(record.nick_name.as_ref())
    .bind(record.avatar_url.as_ref())
    .bind(&record_time)
    .bind(&record_time)
    .execute(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;
    debug!(id, "Game record saved");

    Ok(GameRecord {
        id: Some(id),
        ..record.clone()
    })
}
