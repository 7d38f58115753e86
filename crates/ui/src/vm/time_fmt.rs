use chrono::{DateTime, Utc};

/// Whole seconds as `42s` or `3m 05s`.
#[must_use]
pub fn format_elapsed(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    format!("{}m {:02}s", seconds / 60, seconds % 60)
}

/// Leaderboard timestamp, e.g. `14:05 - 14 Nov 23`.
#[must_use]
pub fn format_score_time(value: DateTime<Utc>) -> String {
    value.format("%H:%M - %d %b %y").to_string()
}

#[must_use]
pub fn format_fact_date(value: DateTime<Utc>) -> String {
    value.format("%b %-d, %Y").to_string()
}
