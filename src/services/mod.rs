// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod media;
pub mod ownership;
pub mod session;
pub mod token;

pub use media::{MediaService, UploadedMedia};
pub use ownership::ensure_owner;
pub use session::SessionService;
pub use token::{TokenPair, TokenService};
