//! Human readable durations and clock labels.
//!
//! Every function takes millisecond timestamps and is pure, except [`now_ms`]
//! which reads the wall clock.

use chrono::{DateTime, Local, Utc};

/// Label returned by [`remaining_label`] once the target time is reached.
pub const READY_MARKER: &str = "**READY!**";

/// Label returned by [`elapsed_label`] for a zero or negative delta.
pub const ZERO_ELAPSED: &str = "0m";

const SECS_PER_DAY: i64 = 24 * 3600;

/// Current wall clock time in milliseconds since epoch.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Time left until `ready_at`, or [`READY_MARKER`] when `ready_at <= now`.
///
/// # Examples
///
/// ```
/// assert_eq!(remaining_label(1_250_000, 1_300_000), "00h 00m 50s");
/// assert_eq!(remaining_label(1_300_000, 1_300_000), READY_MARKER);
/// ```
pub fn remaining_label(now: i64, ready_at: i64) -> String {
    let delta = ready_at - now;
    if delta <= 0 {
        return READY_MARKER.to_owned();
    }
    format_duration(delta)
}

/// Time elapsed since `since`, or [`ZERO_ELAPSED`] when `now <= since`.
pub fn elapsed_label(since: i64, now: i64) -> String {
    let delta = now - since;
    if delta <= 0 {
        return ZERO_ELAPSED.to_owned();
    }
    format_duration(delta)
}

/// Renders `[Nd] HHh MMm SSs` from a positive millisecond duration.
///
/// Milliseconds are truncated, the day segment only appears from one day on.
fn format_duration(millis: i64) -> String {
    let mut seconds = millis / 1000;

    let days = seconds / SECS_PER_DAY;
    seconds %= SECS_PER_DAY;
    let hours = seconds / 3600;
    seconds %= 3600;
    let minutes = seconds / 60;
    seconds %= 60;

    if days > 0 {
        format!("{}d {:02}h {:02}m {:02}s", days, hours, minutes, seconds)
    } else {
        format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
    }
}

fn local_time(millis: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local))
}

/// Local wall clock time, `HH:MM`.
pub fn clock_label(millis: i64) -> String {
    local_time(millis)
        .map(|time| time.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_owned())
}

/// Local weekday and date, e.g. `Monday 01/01/2024`.
pub fn day_label(millis: i64) -> String {
    local_time(millis)
        .map(|time| time.format("%A %d/%m/%Y").to_string())
        .unwrap_or_default()
}
