//! Row normalization.
//!
//! Turns a raw upstream row into an [`AirdropRecord`]. Every field is coerced
//! defensively: a missing or malformed value becomes its zero value and never
//! fails the lookup.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::warn;

use era_core::types::{AirdropRecord, AirdropRow, WalletAddress};

/// Builds a record from the first row; no rows yields the zero-value record.
pub fn normalize_rows(wallet: &WalletAddress, rows: &[AirdropRow], now: DateTime<Utc>) -> AirdropRecord {
    match rows.first() {
        Some(row) => normalize_row(wallet, row, now),
        None => AirdropRecord::zero(wallet),
    }
}

/// Builds a record from a single row.
pub fn normalize_row(wallet: &WalletAddress, row: &AirdropRow, now: DateTime<Utc>) -> AirdropRecord {
    let vesting_end_date = match row.get("vesting_end_date") {
        Some(value) => parse_vesting_date(value).unwrap_or_else(|reason| {
            warn!(wallet = %wallet, %reason, "Date parsing error");
            None
        }),
        None => None,
    };

    AirdropRecord {
        wallet_address: wallet.as_str().to_string(),
        is_claimed: coerce_bool(row, "is_claimed"),
        claimed_amount: coerce_f64(row, "claimed_amount"),
        vested_amount: 0.0,
        total_allocation: coerce_f64(row, "total_allocation"),
        pre_claim_status: coerce_bool(row, "pre_claim_status"),
        vesting_end_date,
        days_left_vesting: Some(vesting_end_date.map_or(0, |end| days_left(end, now))),
        claim_transaction_hash: coerce_string(row, "claim_transaction_hash"),
    }
}

/// Whole days from `now` until `end`, floored, never below zero.
pub fn days_left(end: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let days = end.signed_duration_since(now).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Parses a vesting date from an ISO-8601 string, Dune's `... UTC` text form,
/// or an epoch timestamp in seconds. Null, empty and zero mean "no date".
pub fn parse_vesting_date(value: &Value) -> Result<Option<DateTime<Utc>>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => parse_date_str(s.trim()).map(Some),
        Value::Number(n) => {
            let secs = n.as_f64().ok_or_else(|| format!("unrepresentable timestamp {}", n))?;
            if secs == 0.0 {
                return Ok(None);
            }
            from_epoch_seconds(secs).map(Some)
        }
        other => Err(format!("unsupported vesting date value {}", other)),
    }
}

fn parse_date_str(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    // Naive forms are UTC; Dune renders timestamps as "2024-06-17 00:00:00.000 UTC".
    let naive = s
        .strip_suffix(" UTC")
        .or_else(|| s.strip_suffix('Z'))
        .unwrap_or(s);

    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(naive, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(format!("unrecognized date '{}'", s))
}

fn from_epoch_seconds(secs: f64) -> Result<DateTime<Utc>, String> {
    if !secs.is_finite() {
        return Err(format!("non-finite timestamp {}", secs));
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9) as u32;
    Utc.timestamp_opt(whole as i64, nanos)
        .single()
        .ok_or_else(|| format!("timestamp {} out of range", secs))
}

fn coerce_f64(row: &AirdropRow, key: &str) -> f64 {
    match row.get(key) {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::Bool(b)) => f64::from(u8::from(*b)),
        Some(Value::String(s)) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                warn!(field = key, value = %s, "Unparseable number, using 0");
                0.0
            }
        },
        Some(other) => {
            warn!(field = key, value = %other, "Unexpected number type, using 0");
            0.0
        }
    }
}

fn coerce_bool(row: &AirdropRow, key: &str) -> bool {
    match row.get(key) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map_or(false, |v| v != 0.0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "t" | "1" | "yes" | "y"
        ),
        Some(_) => false,
    }
}

fn coerce_string(row: &AirdropRow, key: &str) -> Option<String> {
    match row.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
