// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for upstream timestamp handling.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse an upstream class start time.
///
/// The upstream reports studio-local times, usually without an offset
/// (`2023-01-01T09:00:00`, sometimes with fractional seconds). Offset-bearing
/// RFC3339 values are accepted too; their wall-clock time is kept as-is.
/// A bare date (`2023-01-01`) is read as midnight.
pub fn parse_local_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()?
                .and_hms_opt(0, 0, 0)
        })
}
