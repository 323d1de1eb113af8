// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated members.
//!
//! Each handler opens its own upstream session with the credentials from
//! the access token. The session guard closes it on every exit path.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::open_session;
use crate::services::workouts::{
    sort_most_recent_first, ClassTotals, DateRange, WorkoutDetail, WorkoutStats,
};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

/// API routes (require authentication via access token).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/total-classes", get(get_total_classes))
        .route("/api/classes/total", get(get_total_classes))
        .route("/api/member-detail", get(get_member_detail))
        .route("/api/members/detail", get(get_member_detail))
}

// ─── Class Totals ────────────────────────────────────────────

#[derive(Serialize)]
pub struct PerformanceData {
    pub retrieved_workouts: usize,
    /// Workout history, most recent first
    pub workouts: Vec<WorkoutDetail>,
}

#[derive(Serialize)]
pub struct ClassesResponse {
    pub performance_data: PerformanceData,
    pub total_classes: ClassTotals,
    pub date_range: Option<DateRange>,
    pub status: String,
    pub message: String,
}

/// Class counts plus the full workout history.
async fn get_total_classes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ClassesResponse>> {
    let email = &user.credentials.email;
    let session = open_session(state.upstream.as_ref(), &user.credentials)
        .await
        .inspect_err(|e| {
            tracing::error!(email = %email, error = %e, "Upstream sign-in failed");
        })?;

    let (workouts, totals) = tokio::try_join!(
        session.performance_summaries(None),
        session.total_classes(),
    )
    .inspect_err(|e| {
        tracing::error!(email = %email, error = %e, "Error retrieving class data");
    })?;

    let workouts = sort_most_recent_first(workouts);
    let details: Vec<WorkoutDetail> = workouts.iter().map(WorkoutDetail::from_summary).collect();

    tracing::info!(
        email = %email,
        workouts = details.len(),
        "Class data retrieved"
    );

    Ok(Json(ClassesResponse {
        performance_data: PerformanceData {
            retrieved_workouts: details.len(),
            workouts: details,
        },
        total_classes: ClassTotals::from(totals),
        date_range: DateRange::from_workouts(&workouts),
        status: "success".to_string(),
        message: "Data retrieved successfully".to_string(),
    }))
}

// ─── Member Profile ──────────────────────────────────────────

#[derive(Serialize)]
pub struct StudioInfo {
    pub home_studio_name: String,
    pub total_studios_visited: u32,
    pub time_zone: Option<String>,
}

#[derive(Serialize)]
pub struct MemberData {
    pub first_name: String,
    pub last_name: String,
    pub user_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workout_stats: Option<WorkoutStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub studio_info: Option<StudioInfo>,
}

#[derive(Serialize)]
pub struct MemberDetailResponse {
    pub status: String,
    pub data: MemberData,
}

/// Member profile subset.
async fn get_member_detail(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<MemberDetailResponse>> {
    let email = &user.credentials.email;
    let session = open_session(state.upstream.as_ref(), &user.credentials)
        .await
        .inspect_err(|e| {
            tracing::error!(email = %email, error = %e, "Upstream sign-in failed");
        })?;

    let member = session
        .member_detail()
        .await
        .inspect_err(|e| {
            tracing::error!(email = %email, error = %e, "Error fetching member detail");
        })?;

    let studio_info = member.home_studio.as_ref().map(|studio| StudioInfo {
        home_studio_name: studio.studio_name.clone(),
        total_studios_visited: member
            .member_class_summary
            .as_ref()
            .map_or(0, |s| s.total_studios_visited),
        time_zone: studio.time_zone.clone(),
    });

    Ok(Json(MemberDetailResponse {
        status: "success".to_string(),
        data: MemberData {
            workout_stats: member
                .member_class_summary
                .as_ref()
                .map(WorkoutStats::from_class_summary),
            studio_info,
            max_hr: member.max_hr,
            first_name: member.first_name,
            last_name: member.last_name,
            user_name: member.user_name,
            email: member.email,
        },
    }))
}
