// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Playlist routes.
//!
//! Add/remove-video are composite ownership checks: both the playlist and
//! the video owner must equal the requester.

use axum::{
    extract::{Path, State},
    routing::{delete, get, patch, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Playlist, PlaylistSummary, PlaylistView};
use crate::response::ApiResponse;
use crate::services::ensure_owner;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/playlists", post(create_playlist))
        .route("/api/v1/playlists/user/{userId}", get(get_user_playlists))
        .route("/api/v1/playlists/{playlistId}", get(get_playlist_by_id))
        .route("/api/v1/playlists/{playlistId}", patch(update_playlist))
        .route("/api/v1/playlists/{playlistId}", delete(delete_playlist))
        .route(
            "/api/v1/playlists/add/{videoId}/{playlistId}",
            patch(add_video_to_playlist),
        )
        .route(
            "/api/v1/playlists/remove/{videoId}/{playlistId}",
            patch(remove_video_from_playlist),
        )
}

#[derive(Deserialize)]
struct PlaylistBody {
    name: String,
    description: String,
}

async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<PlaylistBody>,
) -> Result<ApiResponse<Playlist>> {
    if body.name.trim().is_empty() || body.description.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name and description required for playlist".to_string(),
        ));
    }

    let now = chrono::Utc::now().to_rfc3339();
    let playlist = Playlist {
        id: uuid::Uuid::new_v4().to_string(),
        owner: user.user_id,
        name: body.name,
        description: body.description,
        videos: Vec::new(),
        created_at: now.clone(),
        updated_at: now,
    };
    state.db.upsert_playlist(&playlist).await?;

    Ok(ApiResponse::ok(playlist, "Playlist successfully created"))
}

async fn get_user_playlists(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<PlaylistSummary>>> {
    let playlists = state.db.list_playlists_for_user(&user_id).await?;
    let summaries = state.db.playlist_summaries(playlists).await?;

    Ok(ApiResponse::ok(
        summaries,
        "User playlists fetched successfully",
    ))
}

async fn get_playlist_by_id(
    State(state): State<Arc<AppState>>,
    Path(playlist_id): Path<String>,
) -> Result<ApiResponse<PlaylistView>> {
    let playlist = state
        .db
        .get_playlist(&playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    let view = state.db.playlist_view(&playlist).await?;
    Ok(ApiResponse::ok(view, "Playlist fetched successfully"))
}

/// Fetch playlist + video, check both owners, then apply `mutate`.
async fn mutate_playlist_videos<F>(
    state: &Arc<AppState>,
    playlist_id: &str,
    video_id: &str,
    requester_id: &str,
    forbidden_message: &str,
    mutate: F,
) -> Result<Playlist>
where
    F: FnOnce(&mut Vec<String>, &str),
{
    let mut playlist = state
        .db
        .get_playlist(playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;
    let video = state
        .db
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    // Composite check: both owner fields must match the requester.
    ensure_owner(&playlist.owner, requester_id, forbidden_message)?;
    ensure_owner(&video.owner, requester_id, forbidden_message)?;

    mutate(&mut playlist.videos, video_id);
    playlist.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_playlist(&playlist).await?;

    Ok(playlist)
}

async fn add_video_to_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<ApiResponse<Playlist>> {
    let playlist = mutate_playlist_videos(
        &state,
        &playlist_id,
        &video_id,
        &user.user_id,
        "only owner can add video to their playlist",
        |videos, id| {
            // Set semantics: adding an existing id is a no-op
            if !videos.iter().any(|v| v == id) {
                videos.push(id.to_string());
            }
        },
    )
    .await?;

    Ok(ApiResponse::ok(
        playlist,
        "Added video to playlist successfully",
    ))
}

async fn remove_video_from_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<ApiResponse<Playlist>> {
    let playlist = mutate_playlist_videos(
        &state,
        &playlist_id,
        &video_id,
        &user.user_id,
        "only owner can remove video from their playlist",
        |videos, id| {
            videos.retain(|v| v != id);
        },
    )
    .await?;

    Ok(ApiResponse::ok(
        playlist,
        "Video removed from playlist successfully",
    ))
}

async fn update_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(playlist_id): Path<String>,
    Json(body): Json<PlaylistBody>,
) -> Result<ApiResponse<Playlist>> {
    if body.name.trim().is_empty() || body.description.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name and description required for playlist".to_string(),
        ));
    }

    let mut playlist = state
        .db
        .get_playlist(&playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    ensure_owner(
        &playlist.owner,
        &user.user_id,
        "only owner can update their playlist",
    )?;

    playlist.name = body.name;
    playlist.description = body.description;
    playlist.updated_at = chrono::Utc::now().to_rfc3339();
    state.db.upsert_playlist(&playlist).await?;

    Ok(ApiResponse::ok(playlist, "Playlist updated successfully"))
}

async fn delete_playlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(playlist_id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>> {
    let playlist = state
        .db
        .get_playlist(&playlist_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Playlist not found".to_string()))?;

    ensure_owner(
        &playlist.owner,
        &user.user_id,
        "only owner can delete their playlist",
    )?;

    state.db.delete_playlist(&playlist.id).await?;

    Ok(ApiResponse::ok(
        serde_json::json!({}),
        "Playlist deleted successfully",
    ))
}
