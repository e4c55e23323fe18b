use super::helpers::format_timestamp;
use gridrank_application::ports::DeletePredicate;
use gridrank_domain::{DomainError, RetentionTable};
use sqlx::SqliteConnection;
use std::sync::Arc;
use tracing::{debug, error};

/// Keeps each statement well under SQLite's bound-parameter limit.
const MAX_PLAYERS_PER_STATEMENT: usize = 500;

/// Deletes matching rows on `conn`, oldest first when `batch_limit` is set.
///
/// Runs on whatever the connection is doing: autocommit on a pooled
/// connection, or inside an open transaction.
pub(super) async fn delete_where(
    conn: &mut SqliteConnection,
    table: RetentionTable,
    predicate: &DeletePredicate,
    batch_limit: Option<usize>,
) -> Result<u64, DomainError> {
    let deleted = match predicate {
        DeletePredicate::PlayersIn(players) => {
            delete_players(conn, table, players, batch_limit).await?
        }
        DeletePredicate::OlderThan(mark) => {
            let name = table.table_name();
            let age = table.age_column();
            let filter = format!("({age} < ? OR ({age} = ? AND id < ?))");
            let sql = match batch_limit {
                Some(_) => format!(
                    "DELETE FROM {name} WHERE id IN
                        (SELECT id FROM {name} WHERE {filter} ORDER BY {age} ASC, id ASC LIMIT ?)"
                ),
                None => format!("DELETE FROM {name} WHERE {filter}"),
            };

            let ts = format_timestamp(mark.timestamp);
            let mut query = sqlx::query(&sql).bind(&ts).bind(&ts).bind(mark.id);
            if let Some(limit) = batch_limit {
                query = query.bind(limit as i64);
            }
            query
                .execute(&mut *conn)
                .await
                .map_err(|e| delete_error(table, e))?
                .rows_affected()
        }
    };

    debug!(table = %table, deleted, "Rows deleted");
    Ok(deleted)
}

async fn delete_players(
    conn: &mut SqliteConnection,
    table: RetentionTable,
    players: &[Arc<str>],
    batch_limit: Option<usize>,
) -> Result<u64, DomainError> {
    let name = table.table_name();
    let age = table.age_column();
    let mut remaining = batch_limit;
    let mut deleted = 0;

    for chunk in players.chunks(MAX_PLAYERS_PER_STATEMENT) {
        if remaining == Some(0) {
            break;
        }

        let placeholders = vec!["?"; chunk.len()].join(",");
        let sql = match remaining {
            Some(_) => format!(
                "DELETE FROM {name} WHERE id IN
                    (SELECT id FROM {name} WHERE player_id IN ({placeholders})
                     ORDER BY {age} ASC, id ASC LIMIT ?)"
            ),
            None => format!("DELETE FROM {name} WHERE player_id IN ({placeholders})"),
        };

        let mut query = sqlx::query(&sql);
        for player in chunk {
            query = query.bind(player.as_ref());
        }
        if let Some(limit) = remaining {
            query = query.bind(limit as i64);
        }

        let rows = query
            .execute(&mut *conn)
            .await
            .map_err(|e| delete_error(table, e))?
            .rows_affected();
        deleted += rows;
        remaining = remaining.map(|r| r.saturating_sub(rows as usize));
    }

    Ok(deleted)
}

fn delete_error(table: RetentionTable, e: sqlx::Error) -> DomainError {
    error!(error = %e, table = %table, "Failed to delete rows");
    DomainError::DatabaseError(format!("Failed to delete from {table}: {e}"))
}
