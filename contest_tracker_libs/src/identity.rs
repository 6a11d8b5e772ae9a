use crate::contest::Platform;
use chrono::{DateTime, Utc};

/// Stable identifier for a contest whose source has no numeric id.
///
/// The key is `platform|name|startTimeMillis`. Browsers store bookmarks by this id, so the
/// value has to stay bit-compatible with the `(h << 5) - h + charCode` hash they compute.
pub fn synthetic_id(platform: &Platform, name: &str, start_time: DateTime<Utc>) -> i64 {
    let key = format!(
        "{}|{}|{}",
        platform.as_str(),
        name,
        start_time.timestamp_millis()
    );
    hash_key(&key)
}

/// 32-bit polynomial rolling hash over UTF-16 code units, wrapped on every step.
///
/// Returns the absolute value widened to `i64` so that `i32::MIN` does not overflow.
pub fn hash_key(key: &str) -> i64 {
    let hash = key.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    });
    i64::from(hash).abs()
}
