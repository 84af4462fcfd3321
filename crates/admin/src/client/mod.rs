//! Back-office REST client.
//!
//! Wraps the storefront [`ApiClient`] together with an admin's bearer token.
//! A client can only be built from a session whose user has the admin role,
//! so every method can assume it is authorised client-side; the backend still
//! enforces the role.
//!
//! # Resources
//!
//! - [`catalog`] - products, categories, showcase tiles, testers
//! - [`content`] - site settings and about page
//! - [`orders`] - order list and status changes
//! - [`users`] - account list

pub mod catalog;
pub mod content;
pub mod orders;
pub mod users;

use sabriaz_storefront::api::{ApiClient, segment};
use sabriaz_storefront::stores::{BearerToken, SessionState};

use crate::error::AdminError;

/// Authenticated back-office client.
#[derive(Clone)]
pub struct AdminClient {
    api: ApiClient,
    token: BearerToken,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}

impl AdminClient {
    /// Build a client for the signed-in admin.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Unauthorized` when no one is signed in and
    /// `AdminError::Forbidden` when the user is not an admin.
    pub fn from_session(api: ApiClient, session: &SessionState) -> Result<Self, AdminError> {
        let (Some(user), Some(token)) = (session.user(), session.token()) else {
            return Err(AdminError::Unauthorized);
        };
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, "Non-admin attempted back-office access");
            return Err(AdminError::Forbidden(format!(
                "{} is not an admin",
                user.email
            )));
        }
        Ok(Self {
            api,
            token: token.clone(),
        })
    }

    /// The underlying storefront client, for public reads.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) const fn token(&self) -> &BearerToken {
        &self.token
    }
}

/// `collection/<id>` with the id percent-encoded as a single segment.
pub(crate) fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}", segment(id))
}
