//! Login and registration.

use sabriaz_core::User;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ApiClient, ApiError};
use crate::stores::BearerToken;

/// Successful login or registration response.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

impl AuthResponse {
    /// Split into the pieces the session store keeps.
    #[must_use]
    pub fn into_credentials(self) -> (User, BearerToken) {
        (self.user, BearerToken::new(self.token))
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchange email and password for a user record and bearer token.
    ///
    /// The address is sent exactly as given; callers validate it first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginBody { email, password };
        self.send_json(reqwest::Method::POST, "api/auth/login", &body, None)
            .await
    }

    /// Create an account; the backend signs the new user in immediately.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with the server's message when the email is
    /// taken or the input is rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = RegisterBody {
            name,
            email,
            password,
        };
        self.send_json(reqwest::Method::POST, "api/auth/register", &body, None)
            .await
    }
}
