// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access/refresh token issuance, verification and rotation.
//!
//! Access and refresh tokens are HS256 JWTs signed with distinct secrets.
//! Verification is a pure signature + expiry check; only `rotate` touches
//! the database. Rotation overwrites the user's stored refresh token, so at
//! most one refresh token is live per user at any instant.

use crate::config::Config;
use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::User;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Access token claims: enough identity for a request without a user fetch.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject (user id)
    pub sub: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// Refresh token claims: user id only, plus a nonce.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RefreshClaims {
    /// Subject (user id)
    pub sub: String,
    /// Per-issuance nonce; keeps two rotations within the same second from
    /// producing identical token strings
    pub jti: String,
    pub iat: usize,
    pub exp: usize,
}

/// A freshly rotated access + refresh token pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues and verifies both token kinds.
#[derive(Clone)]
pub struct TokenService {
    access_secret: Vec<u8>,
    refresh_secret: Vec<u8>,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl TokenService {
    pub fn new(
        access_secret: Vec<u8>,
        refresh_secret: Vec<u8>,
        access_ttl_minutes: i64,
        refresh_ttl_days: i64,
    ) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl: chrono::Duration::minutes(access_ttl_minutes),
            refresh_ttl: chrono::Duration::days(refresh_ttl_days),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.access_token_secret.clone(),
            config.refresh_token_secret.clone(),
            config.access_token_ttl_minutes,
            config.refresh_token_ttl_days,
        )
    }

    /// Issue a short-lived access token for a user.
    pub fn issue_access_token(&self, user: &User) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = AccessClaims {
            sub: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            iat: now.timestamp() as usize,
            exp: (now + self.access_ttl).timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.access_secret),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Access token encoding failed: {}", e)))
    }

    /// Issue a long-lived refresh token carrying only the user id.
    pub fn issue_refresh_token(&self, user_id: &str) -> Result<String> {
        let now = chrono::Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.refresh_ttl).timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.refresh_secret),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Refresh token encoding failed: {}", e)))
    }

    /// Verify an access token. Pure check: signature, expiry, shape.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims> {
        let key = DecodingKey::from_secret(&self.access_secret);
        let validation = Validation::new(Algorithm::HS256);

        decode::<AccessClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Verify a refresh token. Pure check: signature, expiry, shape.
    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims> {
        let key = DecodingKey::from_secret(&self.refresh_secret);
        let validation = Validation::new(Algorithm::HS256);

        decode::<RefreshClaims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::InvalidToken)
    }

    /// Issue a new token pair for a user and persist the refresh token,
    /// overwriting any previous value.
    ///
    /// Single path used by both login and the refresh endpoint: the moment
    /// this returns, any prior refresh token for the user is unusable even
    /// if it has not yet expired.
    pub async fn rotate(&self, db: &FirestoreDb, user_id: &str) -> Result<TokenPair> {
        let mut user = db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let access_token = self.issue_access_token(&user)?;
        let refresh_token = self.issue_refresh_token(&user.id)?;

        user.refresh_token = Some(refresh_token.clone());
        user.updated_at = chrono::Utc::now().to_rfc3339();
        db.upsert_user(&user).await?;

        tracing::debug!(user_id = %user.id, "Rotated token pair");

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
