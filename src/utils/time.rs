use chrono::{DateTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Countdown display, e.g. `14:05`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed-time display, e.g. `3m 7s`.
pub fn format_duration(seconds: u32) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}
