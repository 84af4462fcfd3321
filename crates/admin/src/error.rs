//! Unified error handling for admin.

use sabriaz_storefront::api::ApiError;
use sabriaz_storefront::services::UploadError;
use thiserror::Error;

/// Error type for back-office operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Image upload failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// No one is signed in.
    #[error("Unauthorized: sign in with an admin account")]
    Unauthorized,

    /// Signed in, but not as an admin.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Form input rejected before any request was made.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AdminError {
    /// Text for the operator: the server's message when it sent one.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err
                .server_message()
                .map_or_else(|| fallback.to_string(), str::to_string),
            Self::BadRequest(msg) => msg.clone(),
            Self::Unauthorized | Self::Forbidden(_) => self.to_string(),
            Self::Upload(_) => fallback.to_string(),
        }
    }

    /// Log the error, capturing backend and upload failures to Sentry.
    pub fn report(&self) {
        if matches!(self, Self::Api(_) | Self::Upload(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        } else {
            tracing::warn!(error = %self, "Admin request rejected");
        }
    }
}

/// Result type alias for `AdminError`.
pub type Result<T> = std::result::Result<T, AdminError>;
