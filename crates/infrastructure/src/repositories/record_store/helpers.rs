use chrono::{DateTime, NaiveDateTime, Utc};
use gridrank_domain::{CategoryKey, GameRecord, RankDirection, RankField};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::warn;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub const RECORD_COLUMNS: &str =
    "id, player_id, game_type, sub_type, score, play_time, nick_name, avatar_url, record_time";

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn field_column(field: RankField) -> &'static str {
    match field {
        RankField::Score => "score",
        RankField::PlayTime => "play_time",
    }
}

pub fn order_keyword(direction: RankDirection) -> &'static str {
    match direction {
        RankDirection::Ascending => "ASC",
        RankDirection::Descending => "DESC",
    }
}

/// Comparison operator selecting values that rank strictly ahead of a bound.
pub fn better_operator(direction: RankDirection) -> &'static str {
    match direction {
        RankDirection::Ascending => "<",
        RankDirection::Descending => ">",
    }
}

pub fn row_to_record(row: SqliteRow) -> Option<GameRecord> {
    let raw_time: String = row.get("record_time");
    let Some(record_time) = parse_timestamp(&raw_time) else {
        warn!(record_time = %raw_time, "Skipping game record with unreadable timestamp");
        return None;
    };

    let player_id: String = row.get("player_id");
    let nick_name: String = row.get("nick_name");
    let avatar_url: String = row.get("avatar_url");

    Some(GameRecord {
        id: Some(row.get("id")),
        player_id: player_id.into(),
        category: CategoryKey::new(row.get("game_type"), row.get("sub_type")),
        score: row.get("score"),
        play_time: row.get("play_time"),
        nick_name: nick_name.into(),
        avatar_url: avatar_url.into(),
        record_time,
    })
}
