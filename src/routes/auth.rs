// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login route: trades member credentials for an access token.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::services::IssuedToken;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/auth/login", post(login))
}

/// Login request body.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Verify the credentials upstream and issue an access token.
async fn login(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<IssuedToken>> {
    let Json(request) = payload?;
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let issued = state
        .token_service
        .issue(state.upstream.as_ref(), &request.email, &request.password)
        .await?;

    tracing::info!(email = %request.email, "Login successful, token issued");

    Ok(Json(issued))
}
