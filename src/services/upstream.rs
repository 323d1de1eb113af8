// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Upstream session abstraction.
//!
//! Every proxied request opens its own session with the credentials carried
//! in the access token. Sessions are never shared between requests. The
//! [`SessionGuard`] returned by [`open_session`] closes the session when it
//! goes out of scope, whichever way the handler exits.

use crate::error::UpstreamError;
use crate::models::{MemberDetail, PerformanceSummary, TotalClasses};
use crate::services::token::Credentials;
use async_trait::async_trait;
use std::ops::{Deref, DerefMut};

/// Opens authenticated sessions against the upstream fitness API.
#[async_trait]
pub trait UpstreamConnector: Send + Sync {
    /// Sign in with the member's credentials and return a live session.
    async fn open(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn UpstreamSession>, UpstreamError>;
}

/// A signed-in upstream session, scoped to one incoming request.
#[async_trait]
pub trait UpstreamSession: Send + Sync {
    /// Workout history in upstream order. `None` fetches everything.
    async fn performance_summaries(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<PerformanceSummary>, UpstreamError>;

    /// Lifetime in-studio and OT Live attendance counters.
    async fn total_classes(&self) -> Result<TotalClasses, UpstreamError>;

    /// Member profile.
    async fn member_detail(&self) -> Result<MemberDetail, UpstreamError>;

    /// Release the session. Must be idempotent.
    fn close(&mut self);
}

/// Owns an open session and closes it on drop.
pub struct SessionGuard {
    session: Box<dyn UpstreamSession>,
}

impl SessionGuard {
    pub fn new(session: Box<dyn UpstreamSession>) -> Self {
        Self { session }
    }
}

impl Deref for SessionGuard {
    type Target = dyn UpstreamSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl DerefMut for SessionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.session.as_mut()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.close();
        tracing::debug!("Upstream session closed");
    }
}

/// Open a session and wrap it in a [`SessionGuard`].
pub async fn open_session(
    connector: &dyn UpstreamConnector,
    credentials: &Credentials,
) -> Result<SessionGuard, UpstreamError> {
    let session = connector.open(credentials).await?;
    tracing::debug!(email = %credentials.email, "Upstream session opened");
    Ok(SessionGuard::new(session))
}
