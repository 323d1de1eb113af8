// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token authentication middleware.

use crate::error::AppError;
use crate::services::Credentials;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated member extracted from the access token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub credentials: Credentials,
}

/// Middleware that requires a valid access token.
///
/// Rejected requests never reach the handler, so no upstream session is
/// opened for them.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(|| AppError::InvalidToken("Not authenticated".to_string()))?;

    let credentials = state.token_service.decode(token)?;

    request.extensions_mut().insert(AuthUser { credentials });

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
