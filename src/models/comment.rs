// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Comment model.

use serde::{Deserialize, Serialize};

/// A comment on a video. Mutations require `owner == requester`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Document ID (uuid)
    pub id: String,
    /// Video this comment belongs to
    pub video: String,
    /// Owning user's id
    pub owner: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}
