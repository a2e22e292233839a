//! Timezone constants and human-readable timestamp formatting
//!
//! Everything user-visible (figure footer, captions, the publish marker)
//! works in the publisher's local timezone, America/Vancouver.

use chrono::{DateTime, Datelike, NaiveDate, Timelike};
use chrono_tz::Tz;

/// Local timezone of the Metro Vancouver data and the bot's audience
pub const LOCAL_TZ: Tz = chrono_tz::America::Vancouver;

/// Format a timestamp as e.g. "Mar 5, 2024 9:05 AM".
///
/// Day-of-month and hour carry no leading zero; the hour is on a 12-hour
/// clock where midnight and noon both read "12".
pub fn format_short(ts: &DateTime<Tz>) -> String {
    let (is_pm, hour) = ts.hour12();
    format!(
        "{} {}, {} {}:{:02} {}",
        ts.format("%b"),
        ts.day(),
        ts.year(),
        hour,
        ts.minute(),
        if is_pm { "PM" } else { "AM" },
    )
}

/// Format a date as e.g. "March 5" (full month name, no leading zero).
pub fn format_month_day(date: NaiveDate) -> String {
    format!("{} {}", date.format("%B"), date.day())
}
