//! Wall-clock timestamp utilities

use chrono::Utc;

/// Get the current timestamp in microseconds since the Unix epoch
#[inline]
pub fn get_timestamp_us() -> u64 {
    Utc::now().timestamp_micros().max(0) as u64
}
