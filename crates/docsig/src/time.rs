//! Time utilities for docsig.
//!
//! Verification timestamps are Unix epoch microseconds (u64). Protected
//! headers carry RFC 3339 UTC strings.

use chrono::{DateTime, SecondsFormat, Utc};

/// Return the current time as microseconds since Unix epoch.
pub fn now_micros() -> u64 {
    Utc::now().timestamp_micros().max(0) as u64
}

/// Return the current time as an RFC 3339 string with second precision.
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format epoch microseconds the same way as [`now_rfc3339`].
///
/// Values past the range chrono can represent clamp to the epoch.
pub fn micros_to_rfc3339(micros: u64) -> String {
    i64::try_from(micros / 1_000_000)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .unwrap_or(DateTime::UNIX_EPOCH)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
