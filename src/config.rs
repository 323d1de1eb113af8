// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! The configuration is built once at startup and handed to the components
//! that need it through `AppState`.

use jsonwebtoken::Algorithm;
use std::env;

/// Default Cognito endpoint used by the upstream for password sign-in.
const DEFAULT_AUTH_URL: &str = "https://cognito-idp.us-east-1.amazonaws.com/";
/// Public Cognito app client ID of the upstream mobile app.
const DEFAULT_CLIENT_ID: &str = "65knvqta6p37efc2l3eh26pl5o";
const DEFAULT_API_BASE_URL: &str = "https://api.orangetheory.co";
const DEFAULT_PERFORMANCE_BASE_URL: &str = "https://api.orangetheory.io";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Secret used to sign access tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Signing algorithm (HMAC family only)
    pub jwt_algorithm: Algorithm,
    /// Access token lifetime in minutes
    pub token_ttl_minutes: u64,
    /// Origins allowed to call the API from a browser
    pub cors_origins: Vec<String>,
    /// Upstream fitness API endpoints
    pub upstream: UpstreamConfig,
}

/// Where the upstream service lives.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub auth_url: String,
    pub client_id: String,
    pub api_base_url: String,
    pub performance_base_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            auth_url: DEFAULT_AUTH_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            performance_base_url: DEFAULT_PERFORMANCE_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8000,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            jwt_algorithm: Algorithm::HS256,
            token_ttl_minutes: 60 * 24,
            cors_origins: vec!["http://localhost:5173".to_string()],
            upstream: UpstreamConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let jwt_signing_key = env::var("SECRET_KEY")
            .map(|v| v.trim().to_string())
            .map_err(|_| ConfigError::Missing("SECRET_KEY"))?;
        if jwt_signing_key.is_empty() {
            return Err(ConfigError::Invalid {
                var: "SECRET_KEY",
                reason: "must not be empty".to_string(),
            });
        }

        let jwt_algorithm = match env::var("ALGORITHM") {
            Ok(value) => parse_algorithm(&value)?,
            Err(_) => Algorithm::HS256,
        };

        let token_ttl_minutes = match env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Ok(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    var: "ACCESS_TOKEN_EXPIRE_MINUTES",
                    reason: format!("expected a positive integer, got {:?}", value),
                })?,
            Err(_) => 60 * 24,
        };

        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_else(|_| vec!["http://localhost:5173".to_string()]);

        let upstream = UpstreamConfig {
            auth_url: env::var("OTF_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string()),
            client_id: env::var("OTF_CLIENT_ID").unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string()),
            api_base_url: env::var("OTF_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            performance_base_url: env::var("OTF_PERFORMANCE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_PERFORMANCE_BASE_URL.to_string()),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            jwt_signing_key: jwt_signing_key.into_bytes(),
            jwt_algorithm,
            token_ttl_minutes,
            cors_origins,
            upstream,
        })
    }
}

/// Parse a signing algorithm name. Only shared-secret (HMAC) algorithms make
/// sense for a single server-held secret.
fn parse_algorithm(value: &str) -> Result<Algorithm, ConfigError> {
    match value.trim().to_ascii_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(ConfigError::Invalid {
            var: "ALGORITHM",
            reason: format!("unsupported algorithm {:?} (use HS256, HS384 or HS512)", other),
        }),
    }
}

/// Split a comma-separated origin list, dropping blanks and trailing slashes.
fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().trim_end_matches('/'))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
