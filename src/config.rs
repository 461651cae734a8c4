// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Token secrets and expiry policy are loaded once at startup and passed
//! explicitly into the token service, so tests can run with fixed values.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// GCP project ID (or emulator project for local dev)
    pub gcp_project_id: String,
    /// Allowed CORS origin (frontend URL)
    pub cors_origin: String,

    // --- Token policy ---
    /// HMAC key for access tokens (raw bytes)
    pub access_token_secret: Vec<u8>,
    /// HMAC key for refresh tokens; distinct from the access key
    pub refresh_token_secret: Vec<u8>,
    /// Access token lifetime in minutes
    pub access_token_ttl_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_token_ttl_days: i64,

    // --- Media upload relay ---
    /// Cloudinary cloud name
    pub media_cloud_name: String,
    /// Cloudinary API key
    pub media_api_key: String,
    /// Cloudinary API secret
    pub media_api_secret: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),

            access_token_secret: env::var("ACCESS_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("ACCESS_TOKEN_SECRET"))?
                .into_bytes(),
            refresh_token_secret: env::var("REFRESH_TOKEN_SECRET")
                .map_err(|_| ConfigError::Missing("REFRESH_TOKEN_SECRET"))?
                .into_bytes(),
            access_token_ttl_minutes: env::var("ACCESS_TOKEN_TTL_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            refresh_token_ttl_days: env::var("REFRESH_TOKEN_TTL_DAYS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),

            media_cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .map_err(|_| ConfigError::Missing("CLOUDINARY_CLOUD_NAME"))?,
            media_api_key: env::var("CLOUDINARY_API_KEY")
                .map_err(|_| ConfigError::Missing("CLOUDINARY_API_KEY"))?,
            media_api_secret: env::var("CLOUDINARY_API_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("CLOUDINARY_API_SECRET"))?,
        })
    }

    /// Default config for tests: fixed secrets and short, deterministic policy.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            gcp_project_id: "test-project".to_string(),
            cors_origin: "http://localhost:5173".to_string(),
            access_token_secret: b"test_access_secret_32_bytes_ok!!".to_vec(),
            refresh_token_secret: b"test_refresh_secret_32_bytes_ok!".to_vec(),
            access_token_ttl_minutes: 60,
            refresh_token_ttl_days: 10,
            media_cloud_name: "test-cloud".to_string(),
            media_api_key: "test_key".to_string(),
            media_api_secret: "test_secret".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("ACCESS_TOKEN_SECRET", "access_secret_for_tests");
        env::set_var("REFRESH_TOKEN_SECRET", "refresh_secret_for_tests");
        env::set_var("CLOUDINARY_CLOUD_NAME", "cloud");
        env::set_var("CLOUDINARY_API_KEY", "key");
        env::set_var("CLOUDINARY_API_SECRET", "secret");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.access_token_secret, b"access_secret_for_tests");
        assert_eq!(config.refresh_token_secret, b"refresh_secret_for_tests");
        assert_eq!(config.access_token_ttl_minutes, 60);
        assert_eq!(config.refresh_token_ttl_days, 10);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_distinct_secrets_in_test_default() {
        let config = Config::test_default();
        assert_ne!(config.access_token_secret, config.refresh_token_secret);
    }
}
