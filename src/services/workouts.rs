// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reshaping of upstream workout and member data for the dashboard.

use crate::models::{MemberClassSummary, PerformanceSummary, TotalClasses};
use crate::time_utils::parse_local_timestamp;
use chrono::NaiveDateTime;
use serde::Serialize;

pub const UNKNOWN_CLASS: &str = "Unknown Class";
pub const UNKNOWN_TYPE: &str = "Unknown Type";
pub const UNKNOWN_DATE: &str = "Unknown Date";
pub const NO_COACH: &str = "No Coach";
pub const NO_STUDIO: &str = "No Studio";

/// One row of the workout history table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutDetail {
    pub id: String,
    pub class_name: String,
    pub class_type: String,
    pub date: String,
    pub coach: String,
    pub studio: String,
    pub calories_burned: i64,
    pub splat_points: i64,
    pub active_time: i64,
    pub zone_time: ZoneTime,
}

/// Minutes per heart-rate zone, zero when not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ZoneTime {
    pub gray: i64,
    pub blue: i64,
    pub green: i64,
    pub orange: i64,
    pub red: i64,
}

impl WorkoutDetail {
    /// Unpack a summary, substituting placeholders for anything missing.
    pub fn from_summary(summary: &PerformanceSummary) -> Self {
        let class = summary.otf_class.as_ref();
        let details = summary.details.as_ref();

        let zone_time = details
            .and_then(|d| d.zone_time_minutes.as_ref())
            .map(|z| ZoneTime {
                gray: z.gray,
                blue: z.blue,
                green: z.green,
                orange: z.orange,
                red: z.red,
            })
            .unwrap_or_default();

        Self {
            id: summary.id.clone(),
            class_name: class
                .and_then(|c| c.name.clone())
                .unwrap_or_else(|| UNKNOWN_CLASS.to_string()),
            class_type: class
                .and_then(|c| c.class_type.clone())
                .unwrap_or_else(|| UNKNOWN_TYPE.to_string()),
            date: summary
                .starts_at_local()
                .map(str::to_string)
                .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            coach: class
                .and_then(|c| c.coach.as_ref())
                .and_then(|c| c.first_name.clone())
                .unwrap_or_else(|| NO_COACH.to_string()),
            studio: class
                .and_then(|c| c.studio.as_ref())
                .and_then(|s| s.name.clone())
                .unwrap_or_else(|| NO_STUDIO.to_string()),
            calories_burned: details.and_then(|d| d.calories_burned).unwrap_or(0),
            splat_points: details.and_then(|d| d.splat_points).unwrap_or(0),
            active_time: details.and_then(|d| d.active_time_seconds).unwrap_or(0),
            zone_time,
        }
    }
}

/// Parsed start time used for ordering; undated workouts sort as the oldest.
fn sort_key(summary: &PerformanceSummary) -> NaiveDateTime {
    summary
        .starts_at_local()
        .and_then(parse_local_timestamp)
        .unwrap_or(NaiveDateTime::MIN)
}

/// Order workouts newest first. Undated workouts end up last.
pub fn sort_most_recent_first(mut workouts: Vec<PerformanceSummary>) -> Vec<PerformanceSummary> {
    workouts.sort_by_key(|w| std::cmp::Reverse(sort_key(w)));
    workouts
}

/// In-studio, OT Live and combined class counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClassTotals {
    pub in_studio: u32,
    pub ot_live: u32,
    /// Widened so the sum of two `u32` counters cannot overflow
    pub total: u64,
}

impl From<TotalClasses> for ClassTotals {
    fn from(totals: TotalClasses) -> Self {
        Self {
            in_studio: totals.in_studio,
            ot_live: totals.ot_live,
            total: u64::from(totals.in_studio) + u64::from(totals.ot_live),
        }
    }
}

/// Oldest and newest class dates, as reported by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub first_class: String,
    pub last_class: String,
}

impl DateRange {
    /// Earliest and latest start times by parsed value. Falls back to
    /// comparing the raw strings when none of them parse. `None` only when
    /// no workout carries a start time at all.
    pub fn from_workouts(workouts: &[PerformanceSummary]) -> Option<Self> {
        let raw: Vec<&str> = workouts
            .iter()
            .filter_map(PerformanceSummary::starts_at_local)
            .filter(|s| !s.trim().is_empty())
            .collect();

        let parsed: Vec<(NaiveDateTime, &str)> = raw
            .iter()
            .filter_map(|s| Some((parse_local_timestamp(s)?, *s)))
            .collect();

        let (first, last) = if parsed.is_empty() {
            (*raw.iter().min()?, *raw.iter().max()?)
        } else {
            let (_, first) = parsed.iter().min_by_key(|(at, _)| *at)?;
            let (_, last) = parsed.iter().max_by_key(|(at, _)| *at)?;
            (*first, *last)
        };

        Some(Self {
            first_class: first.to_string(),
            last_class: last.to_string(),
        })
    }
}

/// Booking and heart-rate monitor usage derived from the member's lifetime
/// class summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutStats {
    pub total_classes_booked: u32,
    pub total_classes_attended: u32,
    pub total_classes_with_hrm: u32,
    /// Percent of booked classes attended, one decimal
    pub attendance_rate: f64,
    /// Percent of attended classes with an HRM, one decimal
    pub hrm_usage_rate: f64,
    pub first_class_date: Option<String>,
    pub last_class_date: Option<String>,
}

impl WorkoutStats {
    pub fn from_class_summary(summary: &MemberClassSummary) -> Self {
        Self {
            total_classes_booked: summary.total_classes_booked,
            total_classes_attended: summary.total_classes_attended,
            total_classes_with_hrm: summary.total_classes_used_hrm,
            attendance_rate: percent(
                summary.total_classes_attended,
                summary.total_classes_booked,
            ),
            hrm_usage_rate: percent(
                summary.total_classes_used_hrm,
                summary.total_classes_attended,
            ),
            first_class_date: summary.first_visit_date.clone(),
            last_class_date: summary.last_class_visited_date.clone(),
        }
    }
}

/// `part / whole` as a percentage rounded to one decimal; 0 when `whole` is 0.
fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (f64::from(part) / f64::from(whole) * 1000.0).round() / 10.0
}
