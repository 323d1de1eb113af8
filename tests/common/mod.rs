// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use otf_tracker::config::Config;
use otf_tracker::error::UpstreamError;
use otf_tracker::models::{MemberDetail, OtfClass, PerformanceSummary, TotalClasses};
use otf_tracker::routes::create_router;
use otf_tracker::services::{Credentials, TokenService, UpstreamConnector, UpstreamSession};
use otf_tracker::AppState;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const EMAIL: &str = "user@example.com";
pub const PASSWORD: &str = "pw123";

/// In-memory stand-in for the upstream fitness API.
///
/// Records how many sessions were opened and whether each was closed.
#[derive(Default)]
pub struct FakeUpstream {
    pub workouts: Vec<PerformanceSummary>,
    pub totals: TotalClasses,
    pub member: MemberDetail,
    /// Every read fails with an upstream 503 when set
    pub fail_reads: bool,
    /// Only the class totals read fails when set
    pub fail_totals: bool,
    opened: AtomicUsize,
    histories_served: Arc<AtomicUsize>,
    closed_flags: Mutex<Vec<Arc<AtomicBool>>>,
}

#[allow(dead_code)]
impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workouts(mut self, workouts: Vec<PerformanceSummary>) -> Self {
        self.workouts = workouts;
        self
    }

    pub fn with_totals(mut self, in_studio: u32, ot_live: u32) -> Self {
        self.totals = TotalClasses { in_studio, ot_live };
        self
    }

    pub fn with_member(mut self, member: MemberDetail) -> Self {
        self.member = member;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_totals(mut self) -> Self {
        self.fail_totals = true;
        self
    }

    /// Number of workout history reads that returned data.
    pub fn histories_served(&self) -> usize {
        self.histories_served.load(Ordering::SeqCst)
    }

    /// Number of sessions opened (successful sign-ins only).
    pub fn sessions_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    /// True when every opened session has been closed.
    pub fn all_sessions_closed(&self) -> bool {
        self.closed_flags
            .lock()
            .unwrap()
            .iter()
            .all(|closed| closed.load(Ordering::SeqCst))
    }
}

#[async_trait]
impl UpstreamConnector for FakeUpstream {
    async fn open(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn UpstreamSession>, UpstreamError> {
        if credentials.email != EMAIL || credentials.password != PASSWORD {
            return Err(UpstreamError::Auth("Incorrect username or password.".into()));
        }

        self.opened.fetch_add(1, Ordering::SeqCst);
        let closed = Arc::new(AtomicBool::new(false));
        self.closed_flags.lock().unwrap().push(closed.clone());

        Ok(Box::new(FakeSession {
            workouts: self.workouts.clone(),
            totals: self.totals,
            member: self.member.clone(),
            fail_reads: self.fail_reads,
            fail_totals: self.fail_totals,
            histories_served: self.histories_served.clone(),
            closed,
        }))
    }
}

struct FakeSession {
    workouts: Vec<PerformanceSummary>,
    totals: TotalClasses,
    member: MemberDetail,
    fail_reads: bool,
    fail_totals: bool,
    histories_served: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
}

impl FakeSession {
    fn check(&self, fail: bool) -> Result<(), UpstreamError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(UpstreamError::Closed);
        }
        if self.fail_reads || fail {
            return Err(UpstreamError::Status {
                status: 503,
                body: "Service Unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UpstreamSession for FakeSession {
    async fn performance_summaries(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<PerformanceSummary>, UpstreamError> {
        self.check(false)?;
        let take = limit.map_or(self.workouts.len(), |l| l as usize);
        self.histories_served.fetch_add(1, Ordering::SeqCst);
        Ok(self.workouts.iter().take(take).cloned().collect())
    }

    async fn total_classes(&self) -> Result<TotalClasses, UpstreamError> {
        self.check(self.fail_totals)?;
        Ok(self.totals)
    }

    async fn member_detail(&self) -> Result<MemberDetail, UpstreamError> {
        self.check(false)?;
        Ok(self.member.clone())
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

/// A workout with only an ID and a start time.
#[allow(dead_code)]
pub fn workout(id: &str, starts_at_local: &str) -> PerformanceSummary {
    PerformanceSummary {
        id: id.to_string(),
        otf_class: Some(OtfClass {
            name: Some("Orange 60".to_string()),
            starts_at_local: Some(starts_at_local.to_string()),
            ..Default::default()
        }),
        details: None,
    }
}

/// Create a test app backed by `upstream`.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(upstream: Arc<FakeUpstream>) -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let token_service = TokenService::from_config(&config);

    let state = Arc::new(AppState {
        config,
        token_service,
        upstream,
    });

    (create_router(state.clone()), state)
}

/// Mint a valid token for the test member without going through login.
#[allow(dead_code)]
pub fn valid_token(state: &AppState) -> String {
    state
        .token_service
        .mint(&Credentials {
            email: EMAIL.to_string(),
            password: PASSWORD.to_string(),
        })
        .expect("Failed to mint token")
        .access_token
}

#[allow(dead_code)]
pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[allow(dead_code)]
pub fn login_request(uri: &str, email: &str, password: &str) -> Request<Body> {
    let body = serde_json::json!({ "email": email, "password": password });
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
