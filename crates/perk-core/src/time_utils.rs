use chrono::{Datelike, Local};

/// Returns the current Unix timestamp in milliseconds.
pub fn current_unix_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
        .try_into()
        .unwrap_or(u64::MAX)
}

/// Returns the current day of month (1-31) in the local timezone.
pub fn local_day_of_month() -> u32 {
    Local::now().day()
}
