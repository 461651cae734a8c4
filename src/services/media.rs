// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Media upload relay.
//!
//! Posts local files to a Cloudinary-style upload endpoint and returns the
//! hosted URL. Only the avatar/cover handlers call this; the token and
//! ownership core never touches it. On upload failure the local temp file
//! is removed before the error is returned.

use std::path::Path;

use crate::config::Config;
use crate::error::{AppError, Result};
use serde::Deserialize;
use sha2::{Digest, Sha256};

/// Result of a successful upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedMedia {
    /// Hosted HTTPS URL
    #[serde(rename = "secure_url")]
    pub url: String,
    pub public_id: String,
    /// Duration in seconds for video resources
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Client for the external media host.
#[derive(Clone)]
pub struct MediaService {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl MediaService {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            cloud_name: config.media_cloud_name.clone(),
            api_key: config.media_api_key.clone(),
            api_secret: config.media_api_secret.clone(),
        }
    }

    /// Upload a local file; removes the file on failure.
    pub async fn upload(&self, local_path: &Path) -> Result<UploadedMedia> {
        match self.try_upload(local_path).await {
            Ok(media) => {
                tracing::info!(url = %media.url, "File uploaded to media host");
                Ok(media)
            }
            Err(e) => {
                // The temp file is useless once the relay failed.
                if let Err(rm_err) = tokio::fs::remove_file(local_path).await {
                    tracing::warn!(error = %rm_err, "Failed to remove temp file after upload error");
                }
                Err(e)
            }
        }
    }

    async fn try_upload(&self, local_path: &Path) -> Result<UploadedMedia> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| AppError::MediaUpload(format!("Failed to read local file: {}", e)))?;

        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign_upload(&timestamp);

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/auto/upload",
            self.cloud_name
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::MediaUpload(format!("Upload request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::MediaUpload(format!(
                "Upload rejected with {}: {}",
                status, body
            )));
        }

        response
            .json::<UploadedMedia>()
            .await
            .map_err(|e| AppError::MediaUpload(format!("Invalid upload response: {}", e)))
    }

    /// SHA-256 signature over the signed params + API secret.
    fn sign_upload(&self, timestamp: &str) -> String {
        let to_sign = format!("timestamp={}{}", timestamp, self.api_secret);
        let digest = Sha256::digest(to_sign.as_bytes());
        hex::encode(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_signature_is_deterministic() {
        let service = MediaService::new(&Config::test_default());
        let a = service.sign_upload("1700000000");
        let b = service.sign_upload("1700000000");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64); // hex-encoded SHA-256
    }

    #[test]
    fn test_upload_signature_depends_on_timestamp() {
        let service = MediaService::new(&Config::test_default());
        assert_ne!(service.sign_upload("1"), service.sign_upload("2"));
    }
}
