// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! VidTube: backend API for a video-sharing platform
//!
//! This crate provides user accounts with an access/refresh token session
//! lifecycle, plus CRUD over videos' comments, tweets, likes and playlists
//! with owner-only mutation.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::{MediaService, SessionService, TokenService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub tokens: TokenService,
    pub session: SessionService,
    pub media: MediaService,
}
