// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User account stored in Firestore.
///
/// `username` is lowercase-normalized at write time; `username` and `email`
/// are globally unique (checked before create). `refresh_token` holds the
/// single live refresh token for this user, or `None` after logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Document ID (uuid)
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    /// Bcrypt hash; never serialized into responses (see `UserProfile`)
    pub password_hash: String,
    /// Avatar image URL (required at registration)
    pub avatar: String,
    /// Cover image URL
    pub cover_image: Option<String>,
    /// Ordered list of watched video ids
    pub watch_history: Option<Vec<String>>,
    /// Current refresh token, if logged in
    pub refresh_token: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

/// User projection returned by the API: password hash and refresh token
/// stripped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub created_at: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            avatar: user.avatar.clone(),
            cover_image: user.cover_image.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            full_name: "Alice Example".to_string(),
            password_hash: "$2b$12$abcdefghijklmnopqrstuv".to_string(),
            avatar: "https://media.example.com/avatar.png".to_string(),
            cover_image: None,
            watch_history: None,
            refresh_token: Some("some.refresh.token".to_string()),
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_profile_strips_sensitive_fields() {
        let profile = UserProfile::from(&sample_user());
        let value = serde_json::to_value(&profile).unwrap();

        assert_eq!(value["username"], "alice");
        assert_eq!(value["fullName"], "Alice Example");
        assert!(value.get("password_hash").is_none());
        assert!(value.get("passwordHash").is_none());
        assert!(value.get("refresh_token").is_none());
        assert!(value.get("refreshToken").is_none());
    }
}
