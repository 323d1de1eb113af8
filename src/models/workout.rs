// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout history models as returned by the upstream performance API.
//!
//! Every nested field is optional: the upstream omits coach, studio or
//! heart-rate details on some records, and a single sparse record must not
//! fail the whole response.

use super::lenient::{int_or_zero, null_as_default, optional_int};
use serde::{Deserialize, Serialize};

/// One entry of the member's workout history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Performance summary ID
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// The class this workout was recorded in
    #[serde(default, alias = "class")]
    pub otf_class: Option<OtfClass>,
    /// Heart-rate and calorie details (absent when no HRM was worn)
    #[serde(default)]
    pub details: Option<WorkoutDetails>,
}

impl PerformanceSummary {
    /// Local start time string of the class, if the upstream provided one.
    pub fn starts_at_local(&self) -> Option<&str> {
        self.otf_class
            .as_ref()
            .and_then(|c| c.starts_at_local.as_deref())
    }
}

/// Class metadata attached to a workout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtfClass {
    #[serde(default)]
    pub name: Option<String>,
    /// Class type (e.g. "ORANGE_60", "STRENGTH_50")
    #[serde(default, rename = "type")]
    pub class_type: Option<String>,
    /// Start time in studio local time (ISO 8601, usually without offset)
    #[serde(default, alias = "starts_at")]
    pub starts_at_local: Option<String>,
    #[serde(default)]
    pub coach: Option<Coach>,
    #[serde(default)]
    pub studio: Option<Studio>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Coach {
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Studio {
    #[serde(default)]
    pub name: Option<String>,
}

/// Per-workout heart-rate monitor data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutDetails {
    #[serde(default, deserialize_with = "optional_int")]
    pub calories_burned: Option<i64>,
    #[serde(default, deserialize_with = "optional_int")]
    pub splat_points: Option<i64>,
    #[serde(default, deserialize_with = "optional_int")]
    pub active_time_seconds: Option<i64>,
    #[serde(default)]
    pub zone_time_minutes: Option<ZoneTimeMinutes>,
}

/// Minutes spent in each heart-rate zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneTimeMinutes {
    #[serde(default, deserialize_with = "int_or_zero")]
    pub gray: i64,
    #[serde(default, deserialize_with = "int_or_zero")]
    pub blue: i64,
    #[serde(default, deserialize_with = "int_or_zero")]
    pub green: i64,
    #[serde(default, deserialize_with = "int_or_zero")]
    pub orange: i64,
    #[serde(default, deserialize_with = "int_or_zero")]
    pub red: i64,
}

/// Aggregate class attendance counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalClasses {
    /// Classes attended in a physical studio
    pub in_studio: u32,
    /// Classes attended via OT Live (streamed)
    pub ot_live: u32,
}
