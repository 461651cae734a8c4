// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Video metadata model.

use serde::{Deserialize, Serialize};

/// Video metadata stored in Firestore. The binary itself lives on the
/// external media host; only URLs are stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    /// Document ID (uuid)
    pub id: String,
    /// Owning user's id
    pub owner: String,
    pub title: String,
    pub description: String,
    /// URL of the uploaded video file
    pub video_file: String,
    /// URL of the thumbnail image
    pub thumbnail: String,
    /// Duration in seconds
    pub duration: f64,
    pub views: u64,
    pub is_published: bool,
    pub created_at: String,
    pub updated_at: String,
}
