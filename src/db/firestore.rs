// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts, refresh tokens, watch history)
//! - Videos (metadata referenced by comments, likes, playlists)
//! - Comments, Tweets, Playlists (owned resources)
//! - Likes (toggle resources keyed by target + user)
//!
//! List endpoints that the upstream design expressed as aggregation
//! pipelines are composed here from follow-up queries and returned as the
//! typed view structs in `models::views`.

use std::collections::{HashMap, HashSet};

use crate::db::collections;
use crate::error::AppError;
use crate::models::like::LikeTarget;
use crate::models::{
    Comment, CommentView, Like, LikedVideoView, OwnerSummary, Playlist, PlaylistSummary,
    PlaylistView, Tweet, TweetView, User, Video, VideoSummary,
};
use futures_util::{stream, StreamExt};

const MAX_CONCURRENT_DB_OPS: usize = 20;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // With the emulator, use an unauthenticated connection to avoid
        // local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by exact (lowercased) username.
    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let username = username.to_lowercase();
        let mut matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("username").eq(username.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.pop())
    }

    /// Find a user by email.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let email = email.to_string();
        let mut matches: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(move |q| q.for_all([q.field("email").eq(email.clone())]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.pop())
    }

    /// Create or update a user record.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Video Operations ────────────────────────────────────────

    /// Get a video by id.
    pub async fn get_video(&self, video_id: &str) -> Result<Option<Video>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::VIDEOS)
            .obj()
            .one(video_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a video record.
    pub async fn upsert_video(&self, video: &Video) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::VIDEOS)
            .document_id(&video.id)
            .object(video)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Resolve a list of video ids, skipping ids that no longer exist.
    pub async fn get_videos_by_ids(&self, ids: &[String]) -> Result<Vec<Video>, AppError> {
        let results: Vec<Result<Option<Video>, AppError>> = stream::iter(ids.to_vec())
            .map(|id| async move { self.get_video(&id).await })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        let mut by_id: HashMap<String, Video> = HashMap::new();
        for result in results {
            if let Some(video) = result? {
                by_id.insert(video.id.clone(), video);
            }
        }

        // Preserve the caller's ordering
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    // ─── Comment Operations ──────────────────────────────────────

    /// Get a comment by id.
    pub async fn get_comment(&self, comment_id: &str) -> Result<Option<Comment>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::COMMENTS)
            .obj()
            .one(comment_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a comment.
    pub async fn upsert_comment(&self, comment: &Comment) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::COMMENTS)
            .document_id(&comment.id)
            .object(comment)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a comment.
    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::COMMENTS)
            .document_id(comment_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a page of comments for a video, newest first.
    pub async fn list_comments_for_video(
        &self,
        video_id: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Comment>, AppError> {
        let video_id = video_id.to_string();
        let offset = page.saturating_sub(1).saturating_mul(limit);

        self.get_client()?
            .fluent()
            .select()
            .from(collections::COMMENTS)
            .filter(move |q| q.for_all([q.field("video").eq(video_id.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Compose comment views: owner summary, like count and whether the
    /// requester has liked each comment.
    pub async fn comment_views(
        &self,
        comments: Vec<Comment>,
        requester_id: &str,
    ) -> Result<Vec<CommentView>, AppError> {
        let owners = self.owner_summaries(comments.iter().map(|c| c.owner.as_str())).await?;

        let views: Vec<Result<CommentView, AppError>> = stream::iter(comments)
            .map(|comment| {
                let owners = &owners;
                async move {
                    let likes = self
                        .likes_for_target(LikeTarget::Comment, &comment.id)
                        .await?;
                    Ok(CommentView {
                        likes_count: likes.len() as u64,
                        is_liked: likes.iter().any(|l| l.liked_by == requester_id),
                        owner: owners.get(&comment.owner).cloned(),
                        id: comment.id,
                        content: comment.content,
                        created_at: comment.created_at,
                    })
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        views.into_iter().collect()
    }

    // ─── Tweet Operations ────────────────────────────────────────

    /// Get a tweet by id.
    pub async fn get_tweet(&self, tweet_id: &str) -> Result<Option<Tweet>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::TWEETS)
            .obj()
            .one(tweet_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a tweet.
    pub async fn upsert_tweet(&self, tweet: &Tweet) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::TWEETS)
            .document_id(&tweet.id)
            .object(tweet)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a tweet.
    pub async fn delete_tweet(&self, tweet_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::TWEETS)
            .document_id(tweet_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all tweets by a user, newest first.
    pub async fn list_tweets_for_user(&self, user_id: &str) -> Result<Vec<Tweet>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::TWEETS)
            .filter(move |q| q.for_all([q.field("owner").eq(user_id.clone())]))
            .order_by([(
                "created_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Compose tweet views with owner summaries and like counts.
    pub async fn tweet_views(&self, tweets: Vec<Tweet>) -> Result<Vec<TweetView>, AppError> {
        let owners = self.owner_summaries(tweets.iter().map(|t| t.owner.as_str())).await?;

        let views: Vec<Result<TweetView, AppError>> = stream::iter(tweets)
            .map(|tweet| {
                let owners = &owners;
                async move {
                    let likes = self.likes_for_target(LikeTarget::Tweet, &tweet.id).await?;
                    Ok(TweetView {
                        likes_count: likes.len() as u64,
                        owner: owners.get(&tweet.owner).cloned(),
                        id: tweet.id,
                        content: tweet.content,
                        created_at: tweet.created_at,
                    })
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DB_OPS)
            .collect()
            .await;

        views.into_iter().collect()
    }

    // ─── Playlist Operations ─────────────────────────────────────

    /// Get a playlist by id.
    pub async fn get_playlist(&self, playlist_id: &str) -> Result<Option<Playlist>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PLAYLISTS)
            .obj()
            .one(playlist_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a playlist.
    pub async fn upsert_playlist(&self, playlist: &Playlist) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PLAYLISTS)
            .document_id(&playlist.id)
            .object(playlist)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a playlist.
    pub async fn delete_playlist(&self, playlist_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PLAYLISTS)
            .document_id(playlist_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all playlists owned by a user.
    pub async fn list_playlists_for_user(&self, user_id: &str) -> Result<Vec<Playlist>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::PLAYLISTS)
            .filter(move |q| q.for_all([q.field("owner").eq(user_id.clone())]))
            .order_by([(
                "updated_at",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Compose playlist list entries with video/view totals.
    pub async fn playlist_summaries(
        &self,
        playlists: Vec<Playlist>,
    ) -> Result<Vec<PlaylistSummary>, AppError> {
        let mut summaries = Vec::with_capacity(playlists.len());
        for playlist in playlists {
            let videos = self.get_videos_by_ids(&playlist.videos).await?;
            summaries.push(PlaylistSummary {
                total_videos: videos.len() as u64,
                total_views: videos.iter().map(|v| v.views).sum(),
                id: playlist.id,
                name: playlist.name,
                description: playlist.description,
                owner: playlist.owner,
                updated_at: playlist.updated_at,
            });
        }
        Ok(summaries)
    }

    /// Compose the full playlist view: published videos plus owner details.
    pub async fn playlist_view(&self, playlist: &Playlist) -> Result<PlaylistView, AppError> {
        let videos = self.get_videos_by_ids(&playlist.videos).await?;
        let published: Vec<&Video> = videos.iter().filter(|v| v.is_published).collect();
        let owner = self.get_user(&playlist.owner).await?;

        Ok(PlaylistView::compose(playlist, published, owner.as_ref()))
    }

    // ─── Like Operations ─────────────────────────────────────────

    /// Find a like by (target, user), the toggle key.
    pub async fn find_like(
        &self,
        target: LikeTarget,
        target_id: &str,
        user_id: &str,
    ) -> Result<Option<Like>, AppError> {
        let target_id = target_id.to_string();
        let user_id = user_id.to_string();
        let field = target.field();

        let mut matches: Vec<Like> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::LIKES)
            .filter(move |q| {
                q.for_all([
                    q.field(field).eq(target_id.clone()),
                    q.field("liked_by").eq(user_id.clone()),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.pop())
    }

    /// Store a like.
    pub async fn create_like(&self, like: &Like) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::LIKES)
            .document_id(&like.id)
            .object(like)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a like.
    pub async fn delete_like(&self, like_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::LIKES)
            .document_id(like_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All likes on one target.
    pub async fn likes_for_target(
        &self,
        target: LikeTarget,
        target_id: &str,
    ) -> Result<Vec<Like>, AppError> {
        let target_id = target_id.to_string();
        let field = target.field();

        self.get_client()?
            .fluent()
            .select()
            .from(collections::LIKES)
            .filter(move |q| q.for_all([q.field(field).eq(target_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Videos liked by a user, with owner details, newest like first.
    pub async fn liked_videos_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<LikedVideoView>, AppError> {
        let filter_user = user_id.to_string();
        let mut likes: Vec<Like> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::LIKES)
            .filter(move |q| q.for_all([q.field("liked_by").eq(filter_user.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Only video likes; the collection also holds comment/tweet likes.
        likes.retain(|l| l.video.is_some());
        likes.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let video_ids: Vec<String> = likes.iter().filter_map(|l| l.video.clone()).collect();
        let videos = self.get_videos_by_ids(&video_ids).await?;
        let owners = self.owner_summaries(videos.iter().map(|v| v.owner.as_str())).await?;

        Ok(videos
            .iter()
            .map(|video| LikedVideoView {
                video: VideoSummary::from(video),
                is_published: video.is_published,
                owner_details: owners.get(&video.owner).cloned(),
            })
            .collect())
    }

    // ─── Helper Methods ──────────────────────────────────────────

    /// Resolve a set of owner ids into summaries, one fetch per unique id.
    async fn owner_summaries<'a, I>(
        &self,
        owner_ids: I,
    ) -> Result<HashMap<String, OwnerSummary>, AppError>
    where
        I: Iterator<Item = &'a str>,
    {
        let unique: HashSet<&str> = owner_ids.collect();
        let mut owners = HashMap::with_capacity(unique.len());

        for owner_id in unique {
            if let Some(user) = self.get_user(owner_id).await? {
                owners.insert(owner_id.to_string(), OwnerSummary::from(&user));
            }
        }

        Ok(owners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_comment_page_offset_saturates() {
        let db = FirestoreDb::new_mock();

        // Worst-case page/limit must reach the (offline) client and fail
        // there, not blow up in the offset arithmetic.
        let result = db.list_comments_for_video("v1", u32::MAX, 100).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
