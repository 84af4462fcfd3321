//! Account list.

use sabriaz_core::User;
use tracing::instrument;

use super::AdminClient;
use crate::error::Result;

impl AdminClient {
    /// Every registered account.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.api().get_json("api/users", Some(self.token())).await?)
    }
}
