//! Display formatting helpers
//!
//! Mirrors how the tracking UI presents values: DD-MM-YYYY dates, decimal
//! degrees for locations, and dot-grouped rupiah amounts.

use crate::domain::Location;
use chrono::{DateTime, Utc};

/// Format a millisecond timestamp as `DD-MM-YYYY HH:MM` (UTC)
pub fn format_timestamp(ts_ms: u64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts_ms as i64) {
        Some(dt) => dt.format("%d-%m-%Y %H:%M").to_string(),
        None => "-".to_string(),
    }
}

/// Format a millisecond timestamp as `DD-MM-YYYY` (UTC)
pub fn format_date(ts_ms: u64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(ts_ms as i64) {
        Some(dt) => dt.format("%d-%m-%Y").to_string(),
        None => "-".to_string(),
    }
}

/// Format a location stored in millionths of a degree as decimal degrees
pub fn format_location(location: Location) -> String {
    format!(
        "{:.6}, {:.6}",
        location.latitude as f64 / 1_000_000.0,
        location.longitude as f64 / 1_000_000.0
    )
}

/// Format an integer rupiah amount with dot thousands separators
pub fn format_currency(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    if negative {
        format!("-Rp {grouped}")
    } else {
        format!("Rp {grouped}")
    }
}
