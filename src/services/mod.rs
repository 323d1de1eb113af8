// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod otf;
pub mod token;
pub mod upstream;
pub mod workouts;

pub use otf::OtfConnector;
pub use token::{Credentials, IssuedToken, TokenService};
pub use upstream::{open_session, SessionGuard, UpstreamConnector, UpstreamSession};
