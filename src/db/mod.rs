// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const VIDEOS: &str = "videos";
    pub const COMMENTS: &str = "comments";
    pub const TWEETS: &str = "tweets";
    pub const PLAYLISTS: &str = "playlists";
    pub const LIKES: &str = "likes";
}
