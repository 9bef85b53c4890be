//! Time helpers for the business time zone
//!
//! Every day boundary is computed in a named IANA zone, never the host's
//! local zone. Stores and services only see `i64` Unix millis.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Unix millis → wall clock in the business zone
///
/// Out-of-range values collapse to the Unix epoch.
pub fn local_datetime(millis: i64, tz: Tz) -> DateTime<Tz> {
    let utc = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_default();
    utc.with_timezone(&tz)
}

/// Calendar date of `millis` in the business zone
pub fn local_date(millis: i64, tz: Tz) -> NaiveDate {
    local_datetime(millis, tz).date_naive()
}

/// Date at 00:00:00 → Unix millis (business zone)
///
/// DST gap fallback: if local midnight does not exist, fall back to UTC.
pub fn day_start_millis(date: NaiveDate, tz: Tz) -> i64 {
    let naive = date.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

/// Start of the business day containing `now`
pub fn start_of_day_millis(now: i64, tz: Tz) -> i64 {
    day_start_millis(local_date(now, tz), tz)
}

/// Start of the business day `days` days before the one containing `now`
pub fn start_of_days_ago_millis(now: i64, days: u64, tz: Tz) -> i64 {
    let today = local_date(now, tz);
    let date = today.checked_sub_days(Days::new(days)).unwrap_or(today);
    day_start_millis(date, tz)
}

/// Render a timestamp as `dd/mm/YYYY HH:MM:SS` in the business zone
pub fn format_local(millis: i64, tz: Tz) -> String {
    local_datetime(millis, tz)
        .format("%d/%m/%Y %H:%M:%S")
        .to_string()
}

/// Parse an IANA zone name such as `Asia/Jakarta`
pub fn parse_timezone(name: &str) -> Result<Tz, String> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| format!("unknown time zone: {name}"))
}
