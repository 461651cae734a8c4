// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Owner-equality authorization check.
//!
//! Applied by every mutating handler for comments, tweets and playlists,
//! after the resource is known to exist and before the mutation runs.
//! Binary owner-or-nothing: no roles, no delegation, no admin override.

use crate::error::{AppError, Result};

/// Fail with `Forbidden` unless the requester is the resource owner.
///
/// Composite checks (playlist + video) call this once per owner field; all
/// must pass for the operation to proceed.
pub fn ensure_owner(owner_id: &str, requester_id: &str, message: &str) -> Result<()> {
    if owner_id == requester_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_passes() {
        assert!(ensure_owner("u1", "u1", "only owner can edit").is_ok());
    }

    #[test]
    fn test_non_owner_fails() {
        let err = ensure_owner("u1", "u2", "only owner can edit").unwrap_err();
        match err {
            AppError::Forbidden(msg) => assert_eq!(msg, "only owner can edit"),
            other => panic!("expected Forbidden, got {other:?}"),
        }
    }

    #[test]
    fn test_comparison_is_exact() {
        // Ids compare byte-for-byte; no normalization.
        assert!(ensure_owner("U1", "u1", "nope").is_err());
        assert!(ensure_owner("u1 ", "u1", "nope").is_err());
    }
}
