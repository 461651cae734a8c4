// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed projections for denormalized read views.
//!
//! The document store has no server-side joins, so list endpoints compose
//! follow-up queries in the db layer and return these explicit shapes
//! instead of ad hoc JSON.

use crate::models::{Playlist, User, Video};
use serde::{Deserialize, Serialize};

/// Owner fields embedded in denormalized views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// A comment with its owner and like information.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub content: String,
    pub created_at: String,
    pub likes_count: u64,
    /// Whether the requesting user has liked this comment
    pub is_liked: bool,
    pub owner: Option<OwnerSummary>,
}

/// A tweet with its owner and like count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    pub id: String,
    pub content: String,
    pub created_at: String,
    pub likes_count: u64,
    pub owner: Option<OwnerSummary>,
}

/// Video fields embedded in playlist and liked-video views.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: String,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub duration: f64,
    pub views: u64,
    pub created_at: String,
}

impl From<&Video> for VideoSummary {
    fn from(video: &Video) -> Self {
        Self {
            id: video.id.clone(),
            video_file: video.video_file.clone(),
            thumbnail: video.thumbnail.clone(),
            title: video.title.clone(),
            description: video.description.clone(),
            duration: video.duration,
            views: video.views,
            created_at: video.created_at.clone(),
        }
    }
}

/// Playlist list entry with aggregate counts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub total_videos: u64,
    pub total_views: u64,
    pub owner: String,
    pub updated_at: String,
}

/// Full playlist view with published videos and owner details.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub total_videos: u64,
    pub total_views: u64,
    pub videos: Vec<VideoSummary>,
    pub owner: Option<OwnerSummary>,
}

impl PlaylistView {
    /// Compose a view from a playlist, its resolved published videos and
    /// its owner record.
    pub fn compose(playlist: &Playlist, videos: Vec<&Video>, owner: Option<&User>) -> Self {
        let total_views = videos.iter().map(|v| v.views).sum();
        Self {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            description: playlist.description.clone(),
            created_at: playlist.created_at.clone(),
            updated_at: playlist.updated_at.clone(),
            total_videos: videos.len() as u64,
            total_views,
            videos: videos.into_iter().map(VideoSummary::from).collect(),
            owner: owner.map(OwnerSummary::from),
        }
    }
}

/// Entry in the requesting user's liked-videos list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikedVideoView {
    #[serde(flatten)]
    pub video: VideoSummary,
    pub is_published: bool,
    pub owner_details: Option<OwnerSummary>,
}

/// Paginated result wrapper for list endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub docs: Vec<T>,
    pub page: u32,
    pub limit: u32,
    /// True when a further page may exist (a full page was returned)
    pub has_next_page: bool,
}

impl<T> Page<T> {
    pub fn new(docs: Vec<T>, page: u32, limit: u32) -> Self {
        let has_next_page = docs.len() as u32 >= limit;
        Self {
            docs,
            page,
            limit,
            has_next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: &str, views: u64) -> Video {
        Video {
            id: id.to_string(),
            owner: "u1".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            video_file: "https://media.example.com/v.mp4".to_string(),
            thumbnail: "https://media.example.com/t.png".to_string(),
            duration: 10.0,
            views,
            is_published: true,
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_playlist_view_aggregates() {
        let playlist = Playlist {
            id: "p1".to_string(),
            owner: "u1".to_string(),
            name: "watch later".to_string(),
            description: "things".to_string(),
            videos: vec!["v1".to_string(), "v2".to_string()],
            created_at: "2026-01-01T00:00:00Z".to_string(),
            updated_at: "2026-01-01T00:00:00Z".to_string(),
        };
        let v1 = video("v1", 5);
        let v2 = video("v2", 7);

        let view = PlaylistView::compose(&playlist, vec![&v1, &v2], None);
        assert_eq!(view.total_videos, 2);
        assert_eq!(view.total_views, 12);
        assert!(view.owner.is_none());
    }

    #[test]
    fn test_page_has_next_flag() {
        let full: Page<u32> = Page::new(vec![1, 2, 3], 1, 3);
        assert!(full.has_next_page);

        let partial: Page<u32> = Page::new(vec![1], 1, 3);
        assert!(!partial.has_next_page);
    }
}
