// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Playlist model.

use serde::{Deserialize, Serialize};

/// A named, ordered collection of video ids owned by one user.
///
/// `videos` has set semantics on add: adding an id already present is a
/// no-op rather than a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    /// Document ID (uuid)
    pub id: String,
    /// Owning user's id
    pub owner: String,
    pub name: String,
    pub description: String,
    /// Video ids in this playlist
    pub videos: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}
