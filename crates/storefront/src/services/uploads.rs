//! Asset host client for image uploads.
//!
//! Payment screenshots and back-office product images are posted as unsigned
//! multipart uploads. Only the hosted `secure_url` is kept; the file itself
//! never touches the backend.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::config::UploadConfig;

/// Errors that can occur when uploading an asset.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Uploads are not configured for this deployment.
    #[error("Uploads are not configured (set CLOUDINARY_CLOUD_NAME and CLOUDINARY_UPLOAD_PRESET)")]
    NotConfigured,

    /// Local file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Asset host returned an error response.
    #[error("Upload rejected: {status} - {message}")]
    Api { status: u16, message: String },

    /// Asset host accepted the file but returned no URL.
    #[error("Upload response did not contain a secure URL")]
    MissingUrl,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

/// Uploads images to the configured asset host.
#[derive(Clone)]
pub struct AssetUploader {
    client: reqwest::Client,
    config: Option<UploadConfig>,
}

impl std::fmt::Debug for AssetUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetUploader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AssetUploader {
    /// Create an uploader. With no config every upload fails with
    /// [`UploadError::NotConfigured`].
    #[must_use]
    pub const fn new(client: reqwest::Client, config: Option<UploadConfig>) -> Self {
        Self { client, config }
    }

    /// Whether uploads can be attempted at all.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// Upload an image held in memory and return its hosted URL.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` if uploads are not configured, the request
    /// fails, or the response carries no `secure_url`.
    #[instrument(skip(self, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload_bytes(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
        let config = self.config.as_ref().ok_or(UploadError::NotConfigured)?;

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()))
            .text("upload_preset", config.upload_preset.expose_secret().to_string())
            .text("cloud_name", config.cloud_name.clone());

        let response = self
            .client
            .post(config.endpoint.clone())
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Asset upload rejected"
            );
            return Err(UploadError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let url = serde_json::from_str::<UploadResponse>(&text)
            .ok()
            .and_then(|r| r.secure_url)
            .filter(|url| !url.is_empty())
            .ok_or(UploadError::MissingUrl)?;

        tracing::info!(url = %url, "Asset uploaded");
        Ok(url)
    }

    /// Read a local image and upload it.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Read` if the file cannot be read, otherwise as
    /// [`AssetUploader::upload_bytes`].
    pub async fn upload_file(&self, path: &Path) -> Result<String, UploadError> {
        if self.config.is_none() {
            return Err(UploadError::NotConfigured);
        }
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
        self.upload_bytes(&file_name, bytes).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_upload_fails_fast() {
        let uploader = AssetUploader::new(reqwest::Client::new(), None);
        assert!(!uploader.is_configured());
        let err = uploader.upload_bytes("proof.png", vec![1, 2, 3]).await.unwrap_err();
        assert!(matches!(err, UploadError::NotConfigured));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let config = UploadConfig::new("demo", secrecy::SecretString::from("preset")).unwrap();
        let uploader = AssetUploader::new(reqwest::Client::new(), Some(config));
        let err = uploader
            .upload_file(Path::new("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Read { .. }));
    }
}
