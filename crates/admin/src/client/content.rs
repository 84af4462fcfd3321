//! Site copy: home banner, offer strip, about page.

use reqwest::Method;
use sabriaz_core::{AboutContent, SiteSettings};
use tracing::instrument;

use super::AdminClient;
use crate::error::Result;

impl AdminClient {
    /// Replace the site settings.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend rejects the update.
    #[instrument(skip(self, settings))]
    pub async fn update_settings(&self, settings: &SiteSettings) -> Result<()> {
        self.api()
            .call_unit(Method::PUT, "api/settings", settings, Some(self.token()))
            .await?;
        Ok(())
    }

    /// Replace the about-page copy.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the backend rejects the update.
    #[instrument(skip(self, about))]
    pub async fn update_about(&self, about: &AboutContent) -> Result<()> {
        self.api()
            .call_unit(Method::PUT, "api/about", about, Some(self.token()))
            .await?;
        Ok(())
    }
}
