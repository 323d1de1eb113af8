// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Orangetheory API client.
//!
//! Handles:
//! - Password sign-in through the upstream's Cognito user pool
//! - Workout history, class totals and member profile reads
//!
//! A fresh HTTP client is created for each session and dropped when the
//! session closes, so no connection state outlives a request.

use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use crate::models::{MemberDetail, PerformanceSummary, TotalClasses};
use crate::services::token::Credentials;
use crate::services::upstream::{UpstreamConnector, UpstreamSession};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

const COGNITO_INITIATE_AUTH: &str = "AWSCognitoIdentityProviderService.InitiateAuth";
const COGNITO_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Opens [`OtfSession`]s against the configured upstream endpoints.
#[derive(Debug, Clone)]
pub struct OtfConnector {
    config: UpstreamConfig,
}

impl OtfConnector {
    pub fn new(config: UpstreamConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl UpstreamConnector for OtfConnector {
    async fn open(
        &self,
        credentials: &Credentials,
    ) -> Result<Box<dyn UpstreamSession>, UpstreamError> {
        let http = reqwest::Client::new();

        let body = serde_json::json!({
            "AuthFlow": "USER_PASSWORD_AUTH",
            "ClientId": self.config.client_id,
            "AuthParameters": {
                "USERNAME": credentials.email,
                "PASSWORD": credentials.password,
            }
        });

        let response = http
            .post(&self.config.auth_url)
            .header(reqwest::header::CONTENT_TYPE, COGNITO_CONTENT_TYPE)
            .header("X-Amz-Target", COGNITO_INITIATE_AUTH)
            .body(body.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "Upstream sign-in rejected");
            return Err(UpstreamError::Auth(format!("HTTP {}: {}", status, body)));
        }

        let auth: InitiateAuthResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(format!("sign-in response: {}", e)))?;

        let id_token = auth
            .authentication_result
            .map(|r| r.id_token)
            .ok_or_else(|| {
                UpstreamError::Auth("no AuthenticationResult (challenge required?)".into())
            })?;

        let member_uuid = member_uuid_from_id_token(&id_token)?;

        Ok(Box::new(OtfSession {
            http: Some(http),
            id_token,
            member_uuid,
            api_base_url: self.config.api_base_url.trim_end_matches('/').to_string(),
            performance_base_url: self
                .config
                .performance_base_url
                .trim_end_matches('/')
                .to_string(),
        }))
    }
}

/// A signed-in upstream session.
pub struct OtfSession {
    /// `None` once closed
    http: Option<reqwest::Client>,
    id_token: String,
    member_uuid: String,
    api_base_url: String,
    performance_base_url: String,
}

impl OtfSession {
    /// Generic GET request with JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, UpstreamError> {
        let http = self.http.as_ref().ok_or(UpstreamError::Closed)?;

        let response = http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, &self.id_token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            if status == 429 {
                tracing::warn!("Upstream rate limit hit (429)");
            }
            return Err(UpstreamError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(format!("{}: {}", url, e)))
    }
}

#[async_trait]
impl UpstreamSession for OtfSession {
    async fn performance_summaries(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<PerformanceSummary>, UpstreamError> {
        let url = format!("{}/v1/performance-summaries", self.performance_base_url);
        let query: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();

        let page: ItemsEnvelope<PerformanceSummary> = self.get_json(&url, &query).await?;
        Ok(page.items)
    }

    async fn total_classes(&self) -> Result<TotalClasses, UpstreamError> {
        let url = format!("{}/mobile/v1/members/classes/summary", self.api_base_url);
        let summary: DataEnvelope<ClassSummary> = self.get_json(&url, &[]).await?;

        Ok(TotalClasses {
            in_studio: summary.data.total_in_studio_classes_attended,
            ot_live: summary.data.total_otlive_classes_attended,
        })
    }

    async fn member_detail(&self) -> Result<MemberDetail, UpstreamError> {
        let url = format!(
            "{}/member/members/{}",
            self.api_base_url,
            urlencoding::encode(&self.member_uuid)
        );
        let query = [("include", "memberClassSummary,homeStudio".to_string())];
        let detail: DataEnvelope<MemberDetail> = self.get_json(&url, &query).await?;
        Ok(detail.data)
    }

    fn close(&mut self) {
        self.http = None;
        self.id_token.clear();
    }
}

/// Read the `cognito:username` claim (the member UUID) from an ID token.
///
/// The token is issued and checked by the upstream; we only need its payload.
fn member_uuid_from_id_token(id_token: &str) -> Result<String, UpstreamError> {
    let payload = id_token
        .split('.')
        .nth(1)
        .ok_or_else(|| UpstreamError::Decode("ID token is not a JWT".into()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| UpstreamError::Decode(format!("ID token payload: {}", e)))?;

    let claims: IdTokenClaims = serde_json::from_slice(&bytes)
        .map_err(|e| UpstreamError::Decode(format!("ID token claims: {}", e)))?;

    Ok(claims.username)
}

#[derive(Deserialize)]
struct InitiateAuthResponse {
    #[serde(rename = "AuthenticationResult")]
    authentication_result: Option<AuthenticationResult>,
}

#[derive(Deserialize)]
struct AuthenticationResult {
    #[serde(rename = "IdToken")]
    id_token: String,
}

#[derive(Deserialize)]
struct IdTokenClaims {
    #[serde(rename = "cognito:username")]
    username: String,
}

#[derive(Deserialize)]
struct ItemsEnvelope<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassSummary {
    #[serde(default, deserialize_with = "crate::models::lenient::count_or_zero")]
    total_in_studio_classes_attended: u32,
    #[serde(default, deserialize_with = "crate::models::lenient::count_or_zero")]
    total_otlive_classes_attended: u32,
}
