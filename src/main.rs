// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OTF-Tracker API Server
//!
//! Issues access tokens for Orangetheory members and proxies their workout
//! history, class totals and profile to the dashboard frontend.

use otf_tracker::{
    config::Config,
    services::{OtfConnector, TokenService},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        algorithm = ?config.jwt_algorithm,
        token_ttl_minutes = config.token_ttl_minutes,
        cors_origins = ?config.cors_origins,
        "Starting OTF-Tracker API"
    );

    let token_service = TokenService::from_config(&config);
    let upstream = Arc::new(OtfConnector::new(config.upstream.clone()));
    tracing::info!(
        api = %config.upstream.api_base_url,
        "Upstream connector initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        token_service,
        upstream,
    });

    // Build router
    let app = otf_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging. `RUST_LOG` overrides the defaults.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("otf_tracker=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
