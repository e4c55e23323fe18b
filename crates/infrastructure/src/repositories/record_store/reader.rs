use super::helpers::{
    better_operator, field_column, format_timestamp, order_keyword, parse_timestamp,
    row_to_record, RECORD_COLUMNS,
};
use chrono::{DateTime, Utc};
use gridrank_application::ports::RankPredicate;
use gridrank_domain::{
    CategoryKey, DomainError, GameRecord, RankDirection, RankField, RetentionTable, Watermark,
};
use sqlx::{Row, SqlitePool};
use std::sync::Arc;
use tracing::{debug, error, instrument};

#[instrument(skip(pool))]
pub(super) async fn find_top_ordered(
    pool: &SqlitePool,
    category: CategoryKey,
    field: RankField,
    direction: RankDirection,
    limit: usize,
) -> Result<Vec<GameRecord>, DomainError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM game_records
         WHERE game_type = ? AND sub_type = ?
         ORDER BY {} {}, id ASC
         LIMIT ?",
        field_column(field),
        order_keyword(direction),
    );

    let rows = sqlx::query(&sql)
        .bind(category.game_type)
        .bind(category.sub_type)
        .bind(limit as i64)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch ordered records");
            DomainError::DatabaseError(e.to_string())
        })?;

    let records: Vec<GameRecord> = rows.into_iter().filter_map(row_to_record).collect();
    debug!(count = records.len(), "Ordered records fetched");
    Ok(records)
}

#[instrument(skip(pool))]
pub(super) async fn count_where(
    pool: &SqlitePool,
    category: CategoryKey,
    predicate: RankPredicate,
) -> Result<u64, DomainError> {
    let result = match predicate {
        RankPredicate::All => {
            sqlx::query(
                "SELECT COUNT(*) as total FROM game_records WHERE game_type = ? AND sub_type = ?",
            )
            .bind(category.game_type)
            .bind(category.sub_type)
            .fetch_one(pool)
            .await
        }
        RankPredicate::StrictlyBetter {
            field,
            direction,
            value,
        } => {
            let sql = format!(
                "SELECT COUNT(*) as total FROM game_records
                 WHERE game_type = ? AND sub_type = ? AND {} {} ?",
                field_column(field),
                better_operator(direction),
            );
            sqlx::query(&sql)
                .bind(category.game_type)
                .bind(category.sub_type)
                .bind(value)
                .fetch_one(pool)
                .await
        }
    };

    let row = result.map_err(|e| {
        error!(error = %e, "Failed to count records");
        DomainError::DatabaseError(e.to_string())
    })?;
    Ok(row.get::<i64, _>("total") as u64)
}

#[instrument(skip(pool))]
pub(super) async fn find_record(
    pool: &SqlitePool,
    category: CategoryKey,
    player_id: &str,
) -> Result<Option<GameRecord>, DomainError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM game_records
         WHERE player_id = ? AND game_type = ? AND sub_type = ?"
    );

    let row = sqlx::query(&sql)
        .bind(player_id)
        .bind(category.game_type)
        .bind(category.sub_type)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch game record");
            DomainError::DatabaseError(e.to_string())
        })?;

    Ok(row.and_then(row_to_record))
}

pub(super) async fn count_all(pool: &SqlitePool, table: RetentionTable) -> Result<u64, DomainError> {
    let sql = format!("SELECT COUNT(*) as total FROM {}", table.table_name());
    let row = sqlx::query(&sql).fetch_one(pool).await.map_err(|e| {
        error!(error = %e, table = %table, "Failed to count table rows");
        DomainError::DatabaseError(e.to_string())
    })?;
    Ok(row.get::<i64, _>("total") as u64)
}

#[instrument(skip(pool))]
pub(super) async fn find_oldest_boundary(
    pool: &SqlitePool,
    table: RetentionTable,
    offset: u64,
) -> Result<Option<Watermark>, DomainError> {
    let age = table.age_column();
    let sql = format!(
        "SELECT id, {age} as age FROM {}
         ORDER BY {age} ASC, id ASC
         LIMIT 1 OFFSET ?",
        table.table_name(),
    );

    let row = sqlx::query(&sql)
        .bind(offset as i64)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            error!(error = %e, table = %table, "Failed to locate watermark row");
            DomainError::DatabaseError(e.to_string())
        })?;

    let Some(row) = row else {
        return Ok(None);
    };
    let raw: String = row.get("age");
    let timestamp = parse_timestamp(&raw).ok_or_else(|| {
        DomainError::DatabaseError(format!("unreadable {age} '{raw}' in {table}"))
    })?;

    Ok(Some(Watermark {
        id: row.get("id"),
        timestamp,
    }))
}

pub(super) async fn find_active_players(
    pool: &SqlitePool,
    since: DateTime<Utc>,
) -> Result<Vec<Arc<str>>, DomainError> {
    let rows = sqlx::query("SELECT DISTINCT player_id FROM game_records WHERE record_time >= ?")
        .bind(format_timestamp(since))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch active players");
            DomainError::DatabaseError(e.to_string())
        })?;

    Ok(rows
        .into_iter()
        .map(|row| Arc::from(row.get::<String, _>("player_id")))
        .collect())
}

pub(super) async fn find_known_players(pool: &SqlitePool) -> Result<Vec<Arc<str>>, DomainError> {
    let rows = sqlx::query(
        "SELECT player_id FROM player_profiles
         UNION
         SELECT player_id FROM game_records",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch known players");
        DomainError::DatabaseError(e.to_string())
    })?;

    Ok(rows
        .into_iter()
        .map(|row| Arc::from(row.get::<String, _>("player_id")))
        .collect())
}
