// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Member profile model as returned by the upstream member API.

use super::lenient::{count_or_zero, null_as_default, optional_count};
use serde::{Deserialize, Serialize};

/// Member profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    /// Maximum heart rate on file
    #[serde(default, deserialize_with = "optional_count")]
    pub max_hr: Option<u32>,
    #[serde(default)]
    pub member_class_summary: Option<MemberClassSummary>,
    #[serde(default)]
    pub home_studio: Option<HomeStudio>,
}

/// Lifetime booking and attendance counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberClassSummary {
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_classes_booked: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_classes_attended: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_classes_used_hrm: u32,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub total_studios_visited: u32,
    #[serde(default)]
    pub first_visit_date: Option<String>,
    #[serde(default)]
    pub last_class_visited_date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeStudio {
    #[serde(default, deserialize_with = "null_as_default")]
    pub studio_name: String,
    #[serde(default)]
    pub time_zone: Option<String>,
}
