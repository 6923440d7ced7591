use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

/// Walk a nested key path; `None` as soon as a step is missing or not an
/// object.
pub fn path<'a>(v: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let mut cur = v;
    for key in keys {
        cur = cur.get(key)?;
    }
    Some(cur)
}

pub fn opt_str(v: Option<&Value>) -> Option<String> {
    let s = v?.as_str()?.trim();
    if s.is_empty() {
        return None;
    }
    Some(s.to_string())
}

/// Finite float from a number or a numeric string.
pub fn opt_f64(v: Option<&Value>) -> Option<f64> {
    let v = v?;
    if let Some(n) = v.as_f64() {
        return n.is_finite().then_some(n);
    }
    v.as_str()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Non-negative integer count; numeric strings accepted, fractional
/// values floored, negatives rejected.
pub fn opt_count(v: Option<&Value>) -> Option<u32> {
    let n = opt_f64(v)?.floor();
    if n < 0.0 || n > f64::from(u32::MAX) {
        return None;
    }
    Some(n as u32)
}

/// Timestamp from an RFC 3339 string, a bare datetime string (assumed
/// UTC), or an epoch number. Epochs past ~1e10 are milliseconds.
pub fn opt_datetime(v: Option<&Value>) -> Option<DateTime<Utc>> {
    let v = v?;
    if let Some(s) = v.as_str() {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.and_utc());
            }
        }
        return None;
    }
    let n = v.as_i64()?;
    if n.abs() >= 10_000_000_000 {
        DateTime::from_timestamp_millis(n)
    } else {
        DateTime::from_timestamp(n, 0)
    }
}
