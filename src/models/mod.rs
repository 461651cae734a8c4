// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod comment;
pub mod like;
pub mod playlist;
pub mod tweet;
pub mod user;
pub mod video;
pub mod views;

pub use comment::Comment;
pub use like::Like;
pub use playlist::Playlist;
pub use tweet::Tweet;
pub use user::{User, UserProfile};
pub use video::Video;
pub use views::{
    CommentView, LikedVideoView, OwnerSummary, Page, PlaylistSummary, PlaylistView, TweetView,
    VideoSummary,
};
