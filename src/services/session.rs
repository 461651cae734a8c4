// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session lifecycle: register, login, logout, refresh, password change.
//!
//! Orchestrates the credential store (user records) and the token service.
//! Every refresh-path failure (invalid token, unknown user, rotated-away
//! token) surfaces to the client as one generic 401; the distinct causes
//! stay visible in logs.

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{User, UserProfile};
use crate::services::token::{TokenPair, TokenService};

/// Input for user registration.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

/// Session lifecycle operations over the credential store + token service.
#[derive(Clone)]
pub struct SessionService {
    db: FirestoreDb,
    tokens: TokenService,
}

impl SessionService {
    pub fn new(db: FirestoreDb, tokens: TokenService) -> Self {
        Self { db, tokens }
    }

    /// Create a user account. Username is lowercase-normalized; username
    /// and email must be globally unique; the password is stored only as a
    /// bcrypt hash.
    pub async fn register(&self, input: RegisterInput) -> Result<UserProfile> {
        let username = input.username.trim().to_lowercase();
        let email = input.email.trim().to_string();

        if self.db.find_user_by_username(&username).await?.is_some()
            || self.db.find_user_by_email(&email).await?.is_some()
        {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let password_hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;

        let now = chrono::Utc::now().to_rfc3339();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username,
            email,
            full_name: input.full_name.trim().to_string(),
            password_hash,
            avatar: input.avatar.unwrap_or_default(),
            cover_image: input.cover_image,
            watch_history: None,
            refresh_token: None,
            created_at: now.clone(),
            updated_at: now,
        };

        self.db.upsert_user(&user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(UserProfile::from(&user))
    }

    /// Authenticate by username or email + password, then rotate tokens.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<(UserProfile, TokenPair)> {
        let user = self
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| AppError::NotFound("User does not exist".to_string()))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let pair = self.tokens.rotate(&self.db, &user.id).await?;
        tracing::info!(user_id = %user.id, "User logged in");

        Ok((UserProfile::from(&user), pair))
    }

    /// Clear the stored refresh token, invalidating any outstanding one.
    pub async fn logout(&self, user_id: &str) -> Result<()> {
        let mut user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        user.refresh_token = None;
        user.updated_at = chrono::Utc::now().to_rfc3339();
        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "User logged out");
        Ok(())
    }

    /// Exchange a refresh token for a fresh pair.
    ///
    /// The incoming token must verify cryptographically AND match the
    /// stored value byte-for-byte; the latter is what makes rotation
    /// effective against replay of superseded tokens.
    pub async fn refresh(&self, incoming: Option<&str>) -> Result<TokenPair> {
        let incoming = incoming.ok_or(AppError::Unauthorized)?;

        let claims = self.tokens.verify_refresh(incoming)?;

        // A token whose subject no longer resolves is as unauthorized as a
        // forged one; never leak account existence through a 404 here.
        let user = match self.db.get_user(&claims.sub).await? {
            Some(user) => user,
            None => {
                tracing::warn!(user_id = %claims.sub, "Refresh token for unknown user");
                return Err(AppError::InvalidToken);
            }
        };

        match user.refresh_token.as_deref() {
            Some(stored) if stored == incoming => {}
            _ => {
                tracing::warn!(user_id = %user.id, "Refresh token mismatch (rotated or logged out)");
                return Err(AppError::RefreshTokenMismatch);
            }
        }

        self.tokens
            .rotate(&self.db, &user.id)
            .await
            .map_err(|e| match e {
                // Concurrent deletion between the fetch above and rotate.
                AppError::NotFound(_) => AppError::InvalidToken,
                other => other,
            })
    }

    /// Replace the password hash after re-verifying the old password.
    ///
    /// Deliberately leaves the stored refresh token in place, matching the
    /// upstream behavior.
    pub async fn change_password(&self, user_id: &str, old: &str, new: &str) -> Result<()> {
        let mut user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let valid = bcrypt::verify(old, &user.password_hash)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        user.password_hash = bcrypt::hash(new, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))?;
        user.updated_at = chrono::Utc::now().to_rfc3339();
        self.db.upsert_user(&user).await?;

        tracing::info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Look up a user by username (lowercased) or email.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>> {
        if let Some(user) = self.db.find_user_by_username(identifier).await? {
            return Ok(Some(user));
        }
        self.db.find_user_by_email(identifier).await
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_bcrypt_roundtrip() {
        // Minimum cost keeps the test fast; verification is cost-agnostic.
        let hash = bcrypt::hash("s3cret-password", 4).unwrap();
        assert_ne!(hash, "s3cret-password");
        assert!(bcrypt::verify("s3cret-password", &hash).unwrap());
        assert!(!bcrypt::verify("wrong-password", &hash).unwrap());
    }
}
