// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! OTF-Tracker: a thin backend for an Orangetheory workout dashboard
//!
//! This crate exchanges member credentials for a signed access token and
//! proxies read-only queries (workout history, class totals, member
//! profile) to the upstream fitness API, reshaping the results for the
//! frontend.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use services::{TokenService, UpstreamConnector};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub token_service: TokenService,
    pub upstream: Arc<dyn UpstreamConnector>,
}
