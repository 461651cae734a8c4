// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User account and session routes.

use axum::{
    extract::{Multipart, State},
    routing::{get, patch, post},
    Extension, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{AuthUser, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::models::{UserProfile, VideoSummary};
use crate::response::ApiResponse;
use crate::services::session::RegisterInput;
use crate::services::TokenPair;
use crate::AppState;

/// Routes reachable without an access token.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/users/register", post(register))
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/users/refresh-token", post(refresh_token))
}

/// Routes behind the access-token middleware.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/users/logout", post(logout))
        .route("/api/v1/users/change-password", post(change_password))
        .route("/api/v1/users/current-user", get(current_user))
        .route("/api/v1/users/update-account", patch(update_account))
        .route("/api/v1/users/avatar", patch(update_avatar))
        .route("/api/v1/users/cover-image", patch(update_cover_image))
        .route("/api/v1/users/watch-history", get(watch_history))
}

// ─── Cookies ─────────────────────────────────────────────────

fn auth_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Add both token cookies to the jar.
fn with_token_cookies(jar: CookieJar, pair: &TokenPair) -> CookieJar {
    jar.add(auth_cookie(ACCESS_TOKEN_COOKIE, pair.access_token.clone()))
        .add(auth_cookie(REFRESH_TOKEN_COOKIE, pair.refresh_token.clone()))
}

/// Remove both token cookies; attributes must match the creation ones.
fn without_token_cookies(jar: CookieJar) -> CookieJar {
    let mut access = auth_cookie(ACCESS_TOKEN_COOKIE, String::new());
    access.make_removal();
    let mut refresh = auth_cookie(REFRESH_TOKEN_COOKIE, String::new());
    refresh.make_removal();
    jar.add(access).add(refresh)
}

// ─── Registration ────────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    /// Avatar URL; uploaded separately via PATCH /users/avatar
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

async fn register(
    State(state): State<Arc<AppState>>,
    axum::Json(payload): axum::Json<RegisterRequest>,
) -> Result<ApiResponse<UserProfile>> {
    if [&payload.full_name, &payload.email, &payload.username, &payload.password]
        .iter()
        .any(|field| field.trim().is_empty())
    {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let profile = state
        .session
        .register(RegisterInput {
            full_name: payload.full_name,
            email: payload.email,
            username: payload.username,
            password: payload.password,
            avatar: payload.avatar,
            cover_image: payload.cover_image,
        })
        .await?;

    Ok(ApiResponse::ok(profile, "User registered successfully"))
}

// ─── Login / Logout / Refresh ────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    axum::Json(payload): axum::Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<SessionData>)> {
    let identifier = payload
        .username
        .or(payload.email)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("username or email is required".to_string()))?;

    let (user, pair) = state.session.login(&identifier, &payload.password).await?;

    let jar = with_token_cookies(jar, &pair);
    Ok((
        jar,
        ApiResponse::ok(
            SessionData {
                user,
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            },
            "User logged in successfully",
        ),
    ))
}

async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    jar: CookieJar,
) -> Result<(CookieJar, ApiResponse<serde_json::Value>)> {
    state.session.logout(&user.user_id).await?;

    Ok((
        without_token_cookies(jar),
        ApiResponse::ok(serde_json::json!({}), "User logged out successfully"),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
}

/// Exchange a refresh token (cookie or body) for a fresh pair.
async fn refresh_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: Option<axum::Json<RefreshRequest>>,
) -> Result<(CookieJar, ApiResponse<TokenData>)> {
    let incoming = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| payload.and_then(|p| p.0.refresh_token));

    let pair = state.session.refresh(incoming.as_deref()).await?;

    let jar = with_token_cookies(jar, &pair);
    Ok((
        jar,
        ApiResponse::ok(
            TokenData {
                access_token: pair.access_token,
                refresh_token: pair.refresh_token,
            },
            "Access token refreshed",
        ),
    ))
}

// ─── Password / Profile ──────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    axum::Json(payload): axum::Json<ChangePasswordRequest>,
) -> Result<ApiResponse<serde_json::Value>> {
    if payload.new_password.trim().len() < 8 {
        return Err(AppError::BadRequest(
            "New password must be at least 8 characters".to_string(),
        ));
    }

    state
        .session
        .change_password(&user.user_id, &payload.old_password, &payload.new_password)
        .await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Password changed successfully",
    ))
}

async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<UserProfile>> {
    let record = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok(
        UserProfile::from(&record),
        "Current user fetched successfully",
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub full_name: String,
    pub email: String,
}

async fn update_account(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    axum::Json(payload): axum::Json<UpdateAccountRequest>,
) -> Result<ApiResponse<UserProfile>> {
    if payload.full_name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::BadRequest("All fields are required".to_string()));
    }

    let email = payload.email.trim().to_string();
    if let Some(existing) = state.db.find_user_by_email(&email).await? {
        if existing.id != user.user_id {
            return Err(AppError::Conflict("Email is already in use".to_string()));
        }
    }

    let mut record = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    record.full_name = payload.full_name.trim().to_string();
    record.email = email;
    record.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_user(&record).await?;

    Ok(ApiResponse::ok(
        UserProfile::from(&record),
        "Account details updated successfully",
    ))
}

// ─── Media ───────────────────────────────────────────────────

async fn update_avatar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<ApiResponse<UserProfile>> {
    let url = relay_image_upload(&state, multipart, "avatar").await?;

    let mut record = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    record.avatar = url;
    record.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_user(&record).await?;

    Ok(ApiResponse::ok(
        UserProfile::from(&record),
        "Avatar updated successfully",
    ))
}

async fn update_cover_image(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    multipart: Multipart,
) -> Result<ApiResponse<UserProfile>> {
    let url = relay_image_upload(&state, multipart, "coverImage").await?;

    let mut record = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    record.cover_image = Some(url);
    record.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_user(&record).await?;

    Ok(ApiResponse::ok(
        UserProfile::from(&record),
        "Cover image updated successfully",
    ))
}

/// Spool the named multipart field to a temp file and relay it to the
/// media host. The temp file is removed on success; the media service
/// removes it on failure.
async fn relay_image_upload(
    state: &Arc<AppState>,
    mut multipart: Multipart,
    field_name: &str,
) -> Result<String> {
    let mut file_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some(field_name) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?;
            file_bytes = Some(bytes);
            break;
        }
    }

    let bytes =
        file_bytes.ok_or_else(|| AppError::BadRequest(format!("{} file is required", field_name)))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest(format!(
            "{} file is required",
            field_name
        )));
    }

    let temp_path = std::env::temp_dir().join(format!("vidtube-{}", uuid::Uuid::new_v4()));
    tokio::fs::write(&temp_path, &bytes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to spool upload: {}", e)))?;

    let media = state.media.upload(&temp_path).await?;

    if let Err(e) = tokio::fs::remove_file(&temp_path).await {
        tracing::warn!(error = %e, "Failed to remove temp file after upload");
    }

    Ok(media.url)
}

// ─── Watch History ───────────────────────────────────────────

async fn watch_history(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<VideoSummary>>> {
    let record = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let ids = record.watch_history.unwrap_or_default();
    let videos = state.db.get_videos_by_ids(&ids).await?;

    Ok(ApiResponse::ok(
        videos.iter().map(VideoSummary::from).collect(),
        "Watch history fetched successfully",
    ))
}
