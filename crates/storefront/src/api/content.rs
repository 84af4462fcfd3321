//! Site copy and marketing endpoints.

use sabriaz_core::{AboutContent, Email, SiteSettings};
use serde::Serialize;
use tracing::instrument;

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct SubscribeBody<'a> {
    email: &'a str,
}

impl ApiClient {
    /// Home banner and offer strip.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn site_settings(&self) -> Result<SiteSettings, ApiError> {
        self.get("api/settings", None).await
    }

    /// About-page copy.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn about_content(&self) -> Result<AboutContent, ApiError> {
        self.get("api/about", None).await
    }

    /// Add an address to the newsletter list.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message if the address is
    /// refused, for example when already subscribed.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn subscribe(&self, email: &Email) -> Result<(), ApiError> {
        let body = SubscribeBody {
            email: email.as_str(),
        };
        self.send_json_unit(reqwest::Method::POST, "api/subscribe", &body, None)
            .await
    }
}
