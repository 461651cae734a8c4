// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Like model (toggle resource).

use serde::{Deserialize, Serialize};

/// The kind of resource a like points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Video,
    Comment,
    Tweet,
}

impl LikeTarget {
    /// Document field name holding the target id for this kind.
    pub fn field(&self) -> &'static str {
        match self {
            LikeTarget::Video => "video",
            LikeTarget::Comment => "comment",
            LikeTarget::Tweet => "tweet",
        }
    }
}

/// A like by one user on one target (video, comment or tweet).
///
/// Exactly one of the target fields is set. At most one like exists per
/// (user, target) pair; the toggle handlers check before creating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Like {
    /// Document ID (uuid)
    pub id: String,
    /// User who created the like
    pub liked_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet: Option<String>,
    pub created_at: String,
}

impl Like {
    /// Build a like for one target kind.
    pub fn new(id: String, liked_by: String, target: LikeTarget, target_id: String) -> Self {
        let mut like = Self {
            id,
            liked_by,
            video: None,
            comment: None,
            tweet: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        match target {
            LikeTarget::Video => like.video = Some(target_id),
            LikeTarget::Comment => like.comment = Some(target_id),
            LikeTarget::Tweet => like.tweet = Some(target_id),
        }
        like
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_exactly_one_target() {
        let like = Like::new(
            "l1".into(),
            "u1".into(),
            LikeTarget::Comment,
            "c1".into(),
        );
        assert_eq!(like.comment.as_deref(), Some("c1"));
        assert!(like.video.is_none());
        assert!(like.tweet.is_none());
    }

    #[test]
    fn test_target_field_names() {
        assert_eq!(LikeTarget::Video.field(), "video");
        assert_eq!(LikeTarget::Comment.field(), "comment");
        assert_eq!(LikeTarget::Tweet.field(), "tweet");
    }
}
