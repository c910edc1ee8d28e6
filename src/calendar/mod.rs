//! Local calendar-day resolution for the outlet's time zone.
//!
//! Every function takes the instant and the zone explicitly; nothing here
//! reads the host clock or the host's local zone.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::LedgerError;

/// Calendar date of `instant` as seen from `time_zone`.
pub fn local_date(instant: DateTime<Utc>, time_zone: Tz) -> NaiveDate {
    instant.with_timezone(&time_zone).date_naive()
}

pub fn is_same_day(instant: DateTime<Utc>, day: NaiveDate, time_zone: Tz) -> bool {
    local_date(instant, time_zone) == day
}

/// UTC half-open interval `[start, end)` covering `date` in `time_zone`.
pub fn day_window(date: NaiveDate, time_zone: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = start_of_day(date, time_zone);
    let end = match date.succ_opt() {
        Some(next) => start_of_day(next, time_zone),
        None => DateTime::<Utc>::MAX_UTC,
    };
    (start, end)
}

fn start_of_day(date: NaiveDate, time_zone: Tz) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    // Zones that skip midnight on a DST change start the day at the first
    // local minute that exists.
    (0..=180)
        .find_map(|minutes| {
            time_zone
                .from_local_datetime(&(midnight + Duration::minutes(minutes)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// Parse a stored timestamp.
///
/// Offset-less values are wall-clock times at the outlet and are resolved in
/// `time_zone`, taking the earlier instant when the local time is ambiguous.
pub fn parse_timestamp(raw: &str, time_zone: Tz) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return time_zone
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    None
}

/// Resolve an IANA zone name such as `Asia/Jakarta`.
pub fn parse_time_zone(name: &str) -> Result<Tz, LedgerError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| LedgerError::InvalidConfiguration(format!("unknown time zone '{name}'")))
}
