// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Comment routes.

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Comment, CommentView, Page};
use crate::response::ApiResponse;
use crate::services::ensure_owner;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/comments/{videoId}", get(get_video_comments))
        .route("/api/v1/comments/{videoId}", post(add_comment))
        .route("/api/v1/comments/channel/{commentId}", patch(update_comment))
        .route(
            "/api/v1/comments/channel/{commentId}",
            delete(delete_comment),
        )
}

#[derive(Deserialize)]
struct CommentsQuery {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_page() -> u32 {
    1
}
fn default_limit() -> u32 {
    10
}

const MAX_LIMIT: u32 = 100;

/// List comments on a video, newest first, with owner and like info.
async fn get_video_comments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
    Query(query): Query<CommentsQuery>,
) -> Result<ApiResponse<Page<CommentView>>> {
    if query.page == 0 || query.limit == 0 || query.limit > MAX_LIMIT {
        return Err(AppError::BadRequest(
            "page and limit must be positive; limit at most 100".to_string(),
        ));
    }

    state
        .db
        .get_video(&video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let comments = state
        .db
        .list_comments_for_video(&video_id, query.page, query.limit)
        .await?;
    let views = state.db.comment_views(comments, &user.user_id).await?;

    Ok(ApiResponse::ok(
        Page::new(views, query.page, query.limit),
        "Comments fetched successfully",
    ))
}

#[derive(Deserialize)]
struct CommentBody {
    content: String,
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(video_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<ApiResponse<Comment>> {
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    state
        .db
        .get_video(&video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    let now = chrono::Utc::now().to_rfc3339();
    let comment = Comment {
        id: uuid::Uuid::new_v4().to_string(),
        video: video_id,
        owner: user.user_id,
        content: body.content,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_comment(&comment).await?;

    Ok(ApiResponse::ok(comment, "Comment added successfully"))
}

async fn update_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
    Json(body): Json<CommentBody>,
) -> Result<ApiResponse<Comment>> {
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    let mut comment = state
        .db
        .get_comment(&comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    ensure_owner(
        &comment.owner,
        &user.user_id,
        "only comment owner can edit their comment",
    )?;

    comment.content = body.content;
    comment.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_comment(&comment).await?;

    Ok(ApiResponse::ok(comment, "Comment updated successfully"))
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(comment_id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>> {
    let comment = state
        .db
        .get_comment(&comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

    ensure_owner(
        &comment.owner,
        &user.user_id,
        "only comment owner can delete their comment",
    )?;

    state.db.delete_comment(&comment.id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Comment deleted successfully",
    ))
}
