//! REST client for the Sabriaz backend.
//!
//! # Architecture
//!
//! - JSON over HTTPS with `reqwest`; one shared connection pool per client
//! - The backend is the source of truth - NO local sync, direct API calls
//! - Authenticated calls take a [`BearerToken`] explicitly; the client holds no
//!   session of its own
//! - No retries, no backoff: a failure is reported once and the caller decides
//!
//! # Resources
//!
//! - [`auth`] - login and registration
//! - [`catalog`] - products, categories, reviews, showcase tiles, testers
//! - [`orders`] - placing, listing and cancelling orders
//! - [`content`] - site settings, about page, newsletter
//!
//! # Example
//!
//! ```rust,ignore
//! use sabriaz_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api_base_url)?;
//! let products = client.list_products().await?;
//! let reviews = client.product_reviews(&products[0].id).await?;
//! ```

pub mod auth;
pub mod catalog;
pub mod content;
pub mod orders;

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::stores::BearerToken;

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("(no message)"))]
    Api {
        status: u16,
        /// The `message` field of the error body, when there was one.
        message: Option<String>,
    },

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ApiError {
    /// Message supplied by the server, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status of an error response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport failures, 5xx responses and undecodable bodies.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        match self {
            Self::Api { status, .. } => *status >= 500,
            Self::Http(_) | Self::Parse(_) => true,
            Self::Url(_) => false,
        }
    }
}

/// Error body shape used by the backend.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the backend REST API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(base_url: &Url) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sabriaz-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client from an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: &Url) -> Self {
        // Relative joins replace the last path segment unless the base ends in '/'
        let mut base_url = base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        }
    }

    /// Root all request paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Underlying HTTP client, shared with the asset uploader.
    #[must_use]
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Resolve an API path such as `api/products` against the base URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Url` if the path cannot be joined.
    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self.inner.client.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    /// Send a request and decode the JSON response.
    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let text = Self::checked_text(builder).await?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse API response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and ignore the response body.
    async fn execute_unit(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        Self::checked_text(builder).await.map(drop)
    }

    async fn checked_text(builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message)
                .filter(|m| !m.trim().is_empty());
            tracing::debug!(
                status = %status,
                body = %text.chars().take(200).collect::<String>(),
                "API returned non-success status"
            );
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path, token)?).await
    }

    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<T, ApiError> {
        self.execute(self.request(method, path, token)?.json(body)).await
    }

    pub(crate) async fn send_json_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<(), ApiError> {
        self.execute_unit(self.request(method, path, token)?.json(body)).await
    }

    pub(crate) async fn delete(&self, path: &str, token: Option<&BearerToken>) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::DELETE, path, token)?).await
    }
}

/// Admin-facing surface: the same transport, public so the back-office crate
/// can reach resources the storefront never calls.
impl ApiClient {
    /// `GET` a JSON resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decoding failure.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<T, ApiError> {
        self.get(path, token).await
    }

    /// Send a JSON body and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decoding failure.
    pub async fn call_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<T, ApiError> {
        self.send_json(method, path, body, token).await
    }

    /// Send a JSON body and discard the response.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failure.
    pub async fn call_unit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        token: Option<&BearerToken>,
    ) -> Result<(), ApiError> {
        self.send_json_unit(method, path, body, token).await
    }

    /// `DELETE` a resource.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or status failure.
    pub async fn delete_resource(&self, path: &str, token: Option<&BearerToken>) -> Result<(), ApiError> {
        self.delete(path, token).await
    }
}

/// Percent-encode a single path segment.
#[must_use]
pub fn segment(value: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new(&Url::parse("http://127.0.0.1:4000/backend").unwrap()).unwrap();
        assert_eq!(
            client.endpoint("/api/products").unwrap().as_str(),
            "http://127.0.0.1:4000/backend/api/products"
        );
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let client = ApiClient::new(&Url::parse("https://sabriaz-backend.onrender.com").unwrap()).unwrap();
        assert_eq!(
            client.endpoint("api/orders/my").unwrap().as_str(),
            "https://sabriaz-backend.onrender.com/api/orders/my"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 404,
            message: Some("Product not found".to_string()),
        };
        assert_eq!(err.to_string(), "API error: 404 - Product not found");

        let err = ApiError::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error: 500 - (no message)");
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("men perfumes/oud"), "men%20perfumes%2Foud");
    }
}
