// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token issuing and decoding.
//!
//! The upstream has no reusable session token we can hand to the browser,
//! so the access token carries the member's credentials as a claim and every
//! proxied request signs in again with them. Anyone holding a token and the
//! signing secret can recover the password: `SECRET_KEY` must be strong and
//! must never leave the server.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::upstream::{open_session, UpstreamConnector};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Member credentials for the upstream service. Never persisted.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (member email)
    pub sub: String,
    /// Credentials used to re-authenticate upstream on each request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// Login response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: u64,
}

/// Signs and verifies access tokens with the server-held secret.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl TokenService {
    pub fn new(signing_key: &[u8], algorithm: Algorithm, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            algorithm,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.jwt_signing_key,
            config.jwt_algorithm,
            Duration::from_secs(config.token_ttl_minutes * 60),
        )
    }

    /// Verify the credentials upstream, then mint a token for them.
    ///
    /// Any failure while talking to the upstream is reported as invalid
    /// credentials: the caller cannot tell a wrong password from an outage.
    pub async fn issue(
        &self,
        upstream: &dyn UpstreamConnector,
        email: &str,
        password: &str,
    ) -> Result<IssuedToken> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        tracing::info!(email = %credentials.email, "Login attempt");

        if let Err(e) = verify_credentials(upstream, &credentials).await {
            tracing::error!(email = %credentials.email, error = %e, "Login failed");
            return Err(AppError::AuthenticationFailed);
        }

        self.mint(&credentials)
    }

    /// Sign a token embedding `credentials`, valid for the configured lifetime.
    pub fn mint(&self, credentials: &Credentials) -> Result<IssuedToken> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
            .as_secs() as usize;

        let claims = Claims {
            sub: credentials.email.clone(),
            credentials: Some(credentials.clone()),
            iat: now,
            exp: now + self.ttl.as_secs() as usize,
        };

        let access_token = encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.ttl.as_secs(),
        })
    }

    /// Verify signature and expiry and return the embedded credentials.
    pub fn decode(&self, token: &str) -> Result<Credentials> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AppError::InvalidToken("Token has expired or is invalid".to_string())
        })?;

        token_data
            .claims
            .credentials
            .ok_or_else(|| AppError::InvalidToken("Invalid token format".to_string()))
    }
}

/// Sign in upstream and read a single workout. The session guard closes the
/// session before this returns.
async fn verify_credentials(
    upstream: &dyn UpstreamConnector,
    credentials: &Credentials,
) -> std::result::Result<(), crate::error::UpstreamError> {
    let session = open_session(upstream, credentials).await?;
    session.performance_summaries(Some(1)).await?;
    Ok(())
}
