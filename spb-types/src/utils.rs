use chrono::{DateTime, Utc};

/// Convert a Sparkplug millisecond timestamp into a UTC datetime
pub fn datetime_from_millis(millis: u64) -> Option<DateTime<Utc>> {
    let millis = i64::try_from(millis).ok()?;
    DateTime::from_timestamp_millis(millis)
}

/// Convert a UTC datetime into a Sparkplug millisecond timestamp, `None` before the epoch
pub fn datetime_to_millis(datetime: &DateTime<Utc>) -> Option<u64> {
    u64::try_from(datetime.timestamp_millis()).ok()
}
