// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tweet routes.

use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Tweet, TweetView};
use crate::response::ApiResponse;
use crate::services::ensure_owner;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/tweets", post(create_tweet))
        .route("/api/v1/tweets/user/{userId}", get(get_user_tweets))
        .route("/api/v1/tweets/{tweetId}", patch(update_tweet))
        .route("/api/v1/tweets/{tweetId}", delete(delete_tweet))
}

#[derive(Deserialize)]
struct TweetBody {
    content: String,
}

async fn create_tweet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<TweetBody>,
) -> Result<ApiResponse<Tweet>> {
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let tweet = Tweet {
        id: uuid::Uuid::new_v4().to_string(),
        owner: user.user_id,
        content: body.content,
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_tweet(&tweet).await?;

    Ok(ApiResponse::ok(tweet, "Tweet created successfully"))
}

/// All tweets by a user with owner details and like counts.
async fn get_user_tweets(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<TweetView>>> {
    if user_id.trim().is_empty() {
        return Err(AppError::BadRequest("Invalid userId".to_string()));
    }

    let tweets = state.db.list_tweets_for_user(&user_id).await?;
    let views = state.db.tweet_views(tweets).await?;

    Ok(ApiResponse::ok(views, "User tweets fetched successfully"))
}

async fn update_tweet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(tweet_id): Path<String>,
    Json(body): Json<TweetBody>,
) -> Result<ApiResponse<Tweet>> {
    if body.content.trim().is_empty() {
        return Err(AppError::BadRequest("Content is required".to_string()));
    }

    let mut tweet = state
        .db
        .get_tweet(&tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    ensure_owner(
        &tweet.owner,
        &user.user_id,
        "only owner can edit their tweet",
    )?;

    tweet.content = body.content;
    tweet.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_tweet(&tweet).await?;

    Ok(ApiResponse::ok(tweet, "Tweet updated successfully"))
}

async fn delete_tweet(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(tweet_id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>> {
    let tweet = state
        .db
        .get_tweet(&tweet_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))?;

    ensure_owner(
        &tweet.owner,
        &user.user_id,
        "only owner can delete their tweet",
    )?;

    state.db.delete_tweet(&tweet.id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Tweet deleted successfully",
    ))
}
