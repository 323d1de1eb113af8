// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Forgiving field deserializers for upstream payloads.
//!
//! The upstream sends `null` for fields it has no value for, and reports
//! some counters as floats. A field that cannot be read falls back to its
//! default instead of failing the record.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Any JSON value that might carry a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Number {
    fn to_i64(&self) -> Option<i64> {
        let rounded = |v: f64| v.is_finite().then(|| v.round() as i64);
        match self {
            Number::Int(v) => Some(*v),
            Number::Float(v) => rounded(*v),
            Number::Text(s) => s.trim().parse::<f64>().ok().and_then(rounded),
            Number::Other(_) => None,
        }
    }
}

fn to_count(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// `null` becomes `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Integer, float (rounded) or numeric string; anything else is `None`.
pub(crate) fn optional_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Number>::deserialize(deserializer)?.and_then(|n| n.to_i64()))
}

pub(crate) fn int_or_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_int(deserializer)?.unwrap_or(0))
}

/// Non-negative counter, clamped into `u32`.
pub(crate) fn optional_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_int(deserializer)?.map(to_count))
}

pub(crate) fn count_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_count(deserializer)?.unwrap_or(0))
}
