// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Like toggle routes.
//!
//! Likes are toggle resources: the same endpoint creates the like when
//! absent and removes it when present, keyed by (target, requester). The
//! at-most-one-like invariant is enforced by the find-before-create check;
//! the race window between check and write is accepted (the store has no
//! compound uniqueness constraint at this layer).

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::like::LikeTarget;
use crate::models::{Like, LikedVideoView};
use crate::response::ApiResponse;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/likes/toggle/v/{videoId}", post(toggle_video_like))
        .route(
            "/api/v1/likes/toggle/c/{commentId}",
            post(toggle_comment_like),
        )
        .route("/api/v1/likes/toggle/t/{tweetId}", post(toggle_tweet_like))
        .route("/api/v1/likes/videos", get(get_liked_videos))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResult {
    pub is_liked: bool,
}

/// Shared toggle: existence check on the target, then create-if-absent /
/// delete-if-present on the (target, requester) like.
async fn toggle_like(
    state: &Arc<AppState>,
    target: LikeTarget,
    target_id: &str,
    requester_id: &str,
) -> Result<ToggleResult> {
    let exists = match target {
        LikeTarget::Video => state.db.get_video(target_id).await?.is_some(),
        LikeTarget::Comment => state.db.get_comment(target_id).await?.is_some(),
        LikeTarget::Tweet => state.db.get_tweet(target_id).await?.is_some(),
    };
    if !exists {
        let what = match target {
            LikeTarget::Video => "Video",
            LikeTarget::Comment => "Comment",
            LikeTarget::Tweet => "Tweet",
        };
        return Err(AppError::NotFound(format!("{} not found", what)));
    }

    if let Some(existing) = state.db.find_like(target, target_id, requester_id).await? {
        state.db.delete_like(&existing.id).await?;
        return Ok(ToggleResult { is_liked: false });
    }

    let like = Like::new(
        uuid::Uuid::new_v4().to_string(),
        requester_id.to_string(),
        target,
        target_id.to_string(),
    );
    state.db.create_like(&like).await?;

    Ok(ToggleResult { is_liked: true })
}

async fn toggle_video_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<ToggleResult>> {
    let result = toggle_like(&state, LikeTarget::Video, &video_id, &user.user_id).await?;
    let message = if result.is_liked {
        "Video liked successfully"
    } else {
        "Video unliked successfully"
    };
    Ok(ApiResponse::ok(result, message))
}

async fn toggle_comment_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> Result<ApiResponse<ToggleResult>> {
    let result = toggle_like(&state, LikeTarget::Comment, &comment_id, &user.user_id).await?;
    let message = if result.is_liked {
        "Comment liked successfully"
    } else {
        "Comment unliked successfully"
    };
    Ok(ApiResponse::ok(result, message))
}

async fn toggle_tweet_like(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(tweet_id): Path<String>,
) -> Result<ApiResponse<ToggleResult>> {
    let result = toggle_like(&state, LikeTarget::Tweet, &tweet_id, &user.user_id).await?;
    let message = if result.is_liked {
        "Tweet liked successfully"
    } else {
        "Tweet unliked successfully"
    };
    Ok(ApiResponse::ok(result, message))
}

/// All videos the requester has liked, newest like first.
async fn get_liked_videos(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<ApiResponse<Vec<LikedVideoView>>> {
    let videos = state.db.liked_videos_for_user(&user.user_id).await?;
    Ok(ApiResponse::ok(videos, "Liked videos fetched successfully"))
}
