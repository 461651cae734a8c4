// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tweet (short post) model.

use serde::{Deserialize, Serialize};

/// A short text post. Mutations require `owner == requester`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    /// Document ID (uuid)
    pub id: String,
    /// Owning user's id
    pub owner: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}
