use chrono::{DateTime, Days, Local, LocalResult, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use gridrank_domain::DomainError;
use std::fmt;

/// Longest wall-clock gap searched when the fire time falls inside a DST jump.
const MAX_GAP_MINUTES: i64 = 180;

/// Zone the daily fire time is interpreted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScheduleZone {
    #[default]
    Local,
    Named(Tz),
}

impl ScheduleZone {
    /// `None` selects the system zone; anything else must be an IANA name.
    pub fn parse(name: Option<&str>) -> Result<Self, DomainError> {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            None => Ok(ScheduleZone::Local),
            Some(name) => name.parse::<Tz>().map(ScheduleZone::Named).map_err(|e| {
                DomainError::ConfigError(format!("Unknown time zone '{}': {}", name, e))
            }),
        }
    }

    /// Next instant strictly after `now` whose local time in this zone is `at`.
    pub fn next_fire(&self, now: DateTime<Utc>, at: NaiveTime) -> Option<DateTime<Utc>> {
        match self {
            ScheduleZone::Local => {
                next_run_after(&now.with_timezone(&Local), at).map(|t| t.with_timezone(&Utc))
            }
            ScheduleZone::Named(tz) => {
                next_run_after(&now.with_timezone(tz), at).map(|t| t.with_timezone(&Utc))
            }
        }
    }
}

impl fmt::Display for ScheduleZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleZone::Local => f.write_str("local"),
            ScheduleZone::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Today at `at` if that is still ahead of `now`, otherwise tomorrow.
///
/// A fire time skipped by a forward DST jump resolves to the first valid
/// instant after the gap; an ambiguous one resolves to its earlier instant.
pub fn next_run_after<Z: TimeZone>(now: &DateTime<Z>, at: NaiveTime) -> Option<DateTime<Z>> {
    let zone = now.timezone();
    let today = now.date_naive();

    for offset in 0..=2 {
        let date = today.checked_add_days(Days::new(offset))?;
        if let Some(candidate) = resolve_local(&zone, date.and_time(at)) {
            if candidate > *now {
                return Some(candidate);
            }
        }
    }
    None
}

fn resolve_local<Z: TimeZone>(zone: &Z, local: NaiveDateTime) -> Option<DateTime<Z>> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(t) => Some(t),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => (1..=MAX_GAP_MINUTES).find_map(|m| {
            match zone.from_local_datetime(&(local + chrono::Duration::minutes(m))) {
                LocalResult::Single(t) => Some(t),
                LocalResult::Ambiguous(earliest, _) => Some(earliest),
                LocalResult::None => None,
            }
        }),
    }
}
