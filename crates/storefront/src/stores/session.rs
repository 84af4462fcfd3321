//! Signed-in identity and its persisted store.

use std::sync::Arc;

use sabriaz_core::User;
use secrecy::{ExposeSecret, SecretString};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::storage::{Storage, TOKEN_KEY, USER_KEY, load_json, remove_quietly, save_json, write_raw};

/// Opaque bearer credential issued by the backend.
///
/// Never validated or decoded; replayed verbatim in `Authorization` headers.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Who is signed in, if anyone.
///
/// User and token are always both present or both absent.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    credentials: Option<(User, BearerToken)>,
}

impl SessionState {
    /// The signed-in user.
    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.credentials.as_ref().map(|(user, _)| user)
    }

    /// The bearer token of the signed-in user.
    #[must_use]
    pub fn token(&self) -> Option<&BearerToken> {
        self.credentials.as_ref().map(|(_, token)| token)
    }

    /// Whether someone is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    /// Whether the signed-in user may use the back-office.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }
}

/// The session plus its persistence.
pub struct SessionStore {
    state: SessionState,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("state", &self.state).finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Rehydrate the session from storage.
    ///
    /// A user without a token (or the reverse) is treated as signed out.
    #[must_use]
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let user = load_json::<User>(storage.as_ref(), USER_KEY);
        let token = match storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(BearerToken::new),
            Err(e) => {
                tracing::warn!(error = %e, key = TOKEN_KEY, "Failed to read persisted token");
                None
            }
        };

        let credentials = match (user, token) {
            (Some(user), Some(token)) => Some((user, token)),
            (None, None) => None,
            _ => {
                tracing::warn!("Ignoring half-persisted session");
                None
            }
        };

        Self {
            state: SessionState { credentials },
            storage,
        }
    }

    /// Current session.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Sign in: replace user and token together, then persist both.
    ///
    /// If either write fails both keys are removed, so storage never pairs
    /// one account's user with another account's token. The in-memory
    /// session is kept; it just will not survive a restart.
    pub fn set_credentials(&mut self, user: User, token: BearerToken) {
        set_sentry_user(&user.id, Some(user.email.as_str()));
        let storage = self.storage.as_ref();
        let persisted =
            save_json(storage, USER_KEY, &user) && write_raw(storage, TOKEN_KEY, token.expose());
        if !persisted {
            tracing::warn!(user_id = %user.id, "Session not persisted; clearing stored credentials");
            remove_quietly(storage, USER_KEY);
            remove_quietly(storage, TOKEN_KEY);
        }
        self.state.credentials = Some((user, token));
    }

    /// Sign out: drop user and token together and remove them from storage.
    pub fn logout(&mut self) {
        self.state.credentials = None;
        remove_quietly(self.storage.as_ref(), USER_KEY);
        remove_quietly(self.storage.as_ref(), TOKEN_KEY);
        clear_sentry_user();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use sabriaz_core::{UserId, UserRole};

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn customer() -> User {
        User {
            id: UserId::new("u1"),
            name: "Hira".to_string(),
            email: "hira@example.com".to_string(),
            role: UserRole::User,
            created_at: None,
        }
    }

    #[test]
    fn test_starts_signed_out() {
        let store = SessionStore::load(Arc::new(MemoryStorage::new()));
        assert!(!store.state().is_authenticated());
        assert!(store.state().token().is_none());
    }

    #[test]
    fn test_credentials_survive_restart() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let mut store = SessionStore::load(Arc::clone(&storage));
        store.set_credentials(customer(), BearerToken::new("tok-123"));

        let restored = SessionStore::load(storage);
        assert_eq!(restored.state().user(), Some(&customer()));
        assert_eq!(restored.state().token().unwrap().expose(), "tok-123");
        assert!(!restored.state().is_admin());
    }

    #[test]
    fn test_logout_clears_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = SessionStore::load(storage.clone());
        store.set_credentials(customer(), BearerToken::new("tok-123"));
        store.logout();

        assert!(!store.state().is_authenticated());
        assert!(storage.is_empty());
        assert!(!SessionStore::load(storage).state().is_authenticated());
    }

    #[test]
    fn test_half_persisted_session_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "orphan-token").unwrap();
        assert!(!SessionStore::load(storage).state().is_authenticated());
    }

    /// Memory storage whose token writes can be made to fail.
    #[derive(Default)]
    struct TokenWriteFails {
        inner: MemoryStorage,
        failing: AtomicBool,
    }

    impl Storage for TokenWriteFails {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == TOKEN_KEY && self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn user(id: &str, name: &str) -> User {
        User {
            id: UserId::new(id),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            role: UserRole::User,
            created_at: None,
        }
    }

    #[test]
    fn test_failed_token_write_never_pairs_accounts() {
        let storage = Arc::new(TokenWriteFails::default());
        let mut store = SessionStore::load(storage.clone());
        store.set_credentials(user("u-alice", "Alice"), BearerToken::new("alice-token"));

        storage.failing.store(true, Ordering::SeqCst);
        store.set_credentials(user("u-bob", "Bob"), BearerToken::new("bob-token"));

        // The live session is Bob's.
        assert_eq!(store.state().user().unwrap().name, "Bob");
        assert_eq!(store.state().token().unwrap().expose(), "bob-token");

        // After a restart nobody is signed in rather than Bob with Alice's token.
        let restored = SessionStore::load(storage.clone());
        assert!(!restored.state().is_authenticated());
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
        assert_eq!(storage.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = BearerToken::new("very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
