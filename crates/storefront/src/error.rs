//! Unified error handling with Sentry integration.
//!
//! Every fallible storefront operation returns [`Result<T>`]. Front-ends turn
//! an [`AppError`] into a notification with [`AppError::user_message`] and hand
//! it to [`AppError::report`], which captures server-side failures to Sentry.

use std::path::PathBuf;

use thiserror::Error;

use crate::api::ApiError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::services::uploads::UploadError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend request failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Asset upload failed.
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// Configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A local file could not be written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Checkout input rejected before the order was sent.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// The operation needs a signed-in user.
    #[error("Not signed in")]
    NotAuthenticated,

    /// The signed-in user lacks the required role.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The operation was cancelled before it could apply its result.
    #[error("Cancelled")]
    Cancelled,
}

impl AppError {
    /// Text to show the shopper.
    ///
    /// Prefers the message the server sent, then messages for client-side
    /// rejections, and otherwise falls back to `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(err) => err
                .server_message()
                .map_or_else(|| fallback.to_string(), str::to_string),
            Self::Validation(msg) => msg.clone(),
            Self::Checkout(err) => err.to_string(),
            Self::NotAuthenticated => "Please log in to continue.".to_string(),
            Self::Forbidden(_) => "You do not have access to this page.".to_string(),
            Self::Upload(_) | Self::Config(_) | Self::Io { .. } | Self::Cancelled => {
                fallback.to_string()
            }
        }
    }

    /// Whether the failure is on the server, transport or local disk side, as
    /// opposed to something the shopper can fix.
    #[must_use]
    pub fn is_server_side(&self) -> bool {
        match self {
            Self::Api(err) => err.is_server_side(),
            Self::Upload(_) | Self::Io { .. } => true,
            _ => false,
        }
    }

    /// Log the error and capture server-side failures to Sentry.
    pub fn report(&self) {
        if self.is_server_side() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::info!(error = %self, "Request rejected");
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Called when credentials are stored so later errors are attributed.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Called on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "65f0c1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Validation("Please fill all fields".to_string());
        assert_eq!(err.to_string(), "Validation error: Please fill all fields");
        let err = AppError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Checkout error: Your cart is empty");
        assert_eq!(err.user_message("Error placing order"), "Your cart is empty");
    }

    #[test]
    fn test_user_message_prefers_server_message() {
        let err = AppError::Api(ApiError::Api {
            status: 400,
            message: Some("Product out of stock".to_string()),
        });
        assert_eq!(err.user_message("Error placing order"), "Product out of stock");
    }

    #[test]
    fn test_user_message_falls_back() {
        let err = AppError::Api(ApiError::Api {
            status: 502,
            message: None,
        });
        assert_eq!(err.user_message("Error placing order"), "Error placing order");
        assert_eq!(AppError::Cancelled.user_message("Try again"), "Try again");
    }

    #[test]
    fn test_io_error_is_not_a_validation_error() {
        let err = AppError::Io {
            path: PathBuf::from("out/sitemap.xml"),
            source: std::io::Error::other("read-only file system"),
        };
        assert_eq!(err.to_string(), "I/O error on out/sitemap.xml: read-only file system");
        assert_eq!(err.user_message("Could not write sitemap"), "Could not write sitemap");
        assert!(err.is_server_side());
    }

    #[test]
    fn test_server_side_classification() {
        let server = AppError::Api(ApiError::Api {
            status: 500,
            message: None,
        });
        let client = AppError::Api(ApiError::Api {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        });
        assert!(server.is_server_side());
        assert!(!client.is_server_side());
        assert!(!AppError::from(CheckoutError::EmptyCart).is_server_side());
    }
}
