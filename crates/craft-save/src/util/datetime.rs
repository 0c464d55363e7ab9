//! Millisecond timestamps and RFC 3339 formatting.
//!
//! Savefiles store their creation time as milliseconds since the Unix epoch
//! (1970-01-01T00:00:00Z).

use std::time::{SystemTime, UNIX_EPOCH};

const MILLISECONDS_PER_SECOND: i64 = 1_000;
const MILLISECONDS_PER_MINUTE: i64 = 60 * MILLISECONDS_PER_SECOND;
const MILLISECONDS_PER_HOUR: i64 = 60 * MILLISECONDS_PER_MINUTE;
const MILLISECONDS_PER_DAY: i64 = 24 * MILLISECONDS_PER_HOUR;

/// Returns the current time in milliseconds since the Unix epoch.
///
/// Clocks set before the epoch yield 0.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Converts days since Unix epoch to (year, month, day).
fn days_to_date(days: i64) -> (i64, u32, u32) {
    // Howard Hinnant's civil_from_days
    let z = days + 719468;
    let era = if z >= 0 { z } else { z - 146096 } / 146097;
    let doe = (z - era * 146097) as u32; // day of era
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365; // year of era
    let y = yoe as i64 + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // day of year
    let mp = (5 * doy + 2) / 153; // month index
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };

    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

/// Formats milliseconds since Unix epoch as an RFC 3339 UTC datetime.
pub fn format_millis_rfc3339(epoch_millis: i64) -> String {
    let days = epoch_millis.div_euclid(MILLISECONDS_PER_DAY);
    let time_millis = epoch_millis.rem_euclid(MILLISECONDS_PER_DAY);

    let (year, month, day) = days_to_date(days);

    let hours = time_millis / MILLISECONDS_PER_HOUR;
    let minutes = time_millis % MILLISECONDS_PER_HOUR / MILLISECONDS_PER_MINUTE;
    let seconds = time_millis % MILLISECONDS_PER_MINUTE / MILLISECONDS_PER_SECOND;
    let millis = time_millis % MILLISECONDS_PER_SECOND;

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        year, month, day, hours, minutes, seconds, millis
    )
}
