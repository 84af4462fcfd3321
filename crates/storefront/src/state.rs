//! Application state: the one place front-ends reach the storefront through.
//!
//! `AppState` owns the persisted stores and the network clients. It is built
//! by rehydrating every store from storage and needs no teardown; every store
//! has already persisted its last mutation.

use std::path::Path;
use std::sync::Arc;

use sabriaz_core::{Email, Order, OrderId, Product, ProductId, User};
use tokio_util::sync::CancellationToken;
use tracing::instrument;

use crate::api::ApiClient;
use crate::api::catalog::NewReview;
use crate::catalog::Catalog;
use crate::checkout::{self, CheckoutContext, CheckoutRequest};
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::{AssetUploader, whatsapp_link};
use crate::sitemap;
use crate::storage::{FileStorage, Storage};
use crate::stores::{CartItem, CartStore, GuestOrders, SessionStore};

/// Fallback shown when login fails without a server message.
pub const LOGIN_FAILED: &str = "Login failed";

/// Fallback shown when registration fails without a server message.
pub const REGISTER_FAILED: &str = "Registration failed";

/// Fallback shown when cancelling fails without a server message.
pub const CANCEL_FAILED: &str = "Cancel failed";

/// Storefront client state.
pub struct AppState {
    config: StorefrontConfig,
    api: ApiClient,
    uploader: AssetUploader,
    cart: CartStore,
    session: SessionStore,
    guest_orders: GuestOrders,
    catalog: Catalog,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("cart", &self.cart)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Build state backed by files under the configured storage directory.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self> {
        let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(config.storage_dir.clone()));
        Self::with_storage(config, storage)
    }

    /// Build state over an arbitrary storage backend, rehydrating every store.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the HTTP client cannot be built.
    pub fn with_storage(config: StorefrontConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let api = ApiClient::new(&config.api_base_url)?;
        let uploader = AssetUploader::new(api.http().clone(), config.uploads.clone());

        let cart = CartStore::load(Arc::clone(&storage));
        let session = SessionStore::load(Arc::clone(&storage));
        let guest_orders = GuestOrders::load(storage);

        tracing::debug!(
            cart_items = cart.state().items().len(),
            authenticated = session.state().is_authenticated(),
            guest_orders = guest_orders.ids().len(),
            "State rehydrated"
        );

        Ok(Self {
            config,
            api,
            uploader,
            cart,
            session,
            guest_orders,
            catalog: Catalog::new(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn uploader(&self) -> &AssetUploader {
        &self.uploader
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Cart mutations; every one persists.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    #[must_use]
    pub const fn guest_orders(&self) -> &GuestOrders {
        &self.guest_orders
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // =========================================================================
    // Account
    // =========================================================================

    /// Sign in and persist the session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a malformed email and
    /// `AppError::Api` if the backend refuses the credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, email: &str, password: &str) -> Result<User> {
        // Validated, but sent with the casing the user typed.
        parse_email(email)?;
        let (user, token) = self.api.login(email.trim(), password).await?.into_credentials();
        self.session.set_credentials(user.clone(), token);
        add_breadcrumb("auth", "Logged in", None);
        Ok(user)
    }

    /// Create an account and sign in.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for blank fields or a malformed email and
    /// `AppError::Api` if the backend refuses the registration.
    #[instrument(skip(self, password))]
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Please fill all fields".to_string()));
        }
        parse_email(email)?;
        let (user, token) = self
            .api
            .register(name, email.trim(), password)
            .await?
            .into_credentials();
        self.session.set_credentials(user.clone(), token);
        add_breadcrumb("auth", "Registered", None);
        Ok(user)
    }

    /// Sign out and forget the token.
    pub fn logout(&mut self) {
        self.session.logout();
        add_breadcrumb("auth", "Logged out", None);
    }

    // =========================================================================
    // Catalog and cart
    // =========================================================================

    /// Refetch products and ratings.
    ///
    /// # Errors
    ///
    /// See [`Catalog::refresh`].
    pub async fn refresh_catalog(&mut self, cancel: &CancellationToken) -> Result<()> {
        self.catalog.refresh(&self.api, cancel).await
    }

    /// Find a product in the cache, falling back to the backend.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the product is not cached and cannot be
    /// fetched.
    pub async fn product(&self, id: &ProductId) -> Result<Product> {
        if let Some(entry) = self.catalog.get(id) {
            return Ok(entry.product.clone());
        }
        Ok(self.api.get_product(id).await?)
    }

    /// Add one unit of a product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the product cannot be found.
    pub async fn add_to_cart(&mut self, id: &ProductId) -> Result<()> {
        let product = self.product(id).await?;
        self.cart.add_item(CartItem::from(&product));
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
        Ok(())
    }

    /// Post a product review.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the backend rejects the review.
    pub async fn submit_review(&self, review: &NewReview) -> Result<()> {
        Ok(self.api.create_review(review).await?)
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place an order for the cart. See [`checkout::place_order`].
    ///
    /// # Errors
    ///
    /// See [`checkout::place_order`].
    pub async fn checkout(&mut self, request: &CheckoutRequest) -> Result<Order> {
        let ctx = CheckoutContext {
            api: &self.api,
            uploader: &self.uploader,
            cart: &mut self.cart,
            session: self.session.state(),
            guest_orders: &mut self.guest_orders,
        };
        checkout::place_order(ctx, request).await
    }

    /// The customer's orders: account history when signed in, otherwise the
    /// orders this device placed as a guest.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Api` if the request fails.
    pub async fn my_orders(&self) -> Result<Vec<Order>> {
        let orders = match self.session.state().token() {
            Some(token) => self.api.my_orders(token).await?,
            None => self.api.guest_orders(self.guest_orders.ids()).await?,
        };
        Ok(orders)
    }

    /// Cancel an order of the signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotAuthenticated` when signed out, otherwise
    /// `AppError::Api` if the backend refuses.
    pub async fn cancel_order(&self, id: &OrderId) -> Result<()> {
        let token = self.session.state().token().ok_or(AppError::NotAuthenticated)?;
        self.api.cancel_order(id, token).await?;
        add_breadcrumb("orders", "Order cancelled", Some(&[("order_id", id.as_str())]));
        Ok(())
    }

    // =========================================================================
    // Marketing
    // =========================================================================

    /// Subscribe an address to the newsletter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for a malformed email and
    /// `AppError::Api` if the backend refuses.
    pub async fn subscribe(&self, email: &str) -> Result<()> {
        let email = parse_email(email)?;
        Ok(self.api.subscribe(&email).await?)
    }

    /// WhatsApp link carrying the shopper's message.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if the message is blank.
    pub fn contact_link(&self, message: &str) -> Result<String> {
        whatsapp_link(&self.config.whatsapp_phone, message)
            .map_err(|e| AppError::Validation(e.to_string()))
    }

    /// Write the sitemap for the configured site URL.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the file cannot be written.
    pub fn write_sitemap(&self, path: &Path) -> Result<()> {
        sitemap::write(path, self.config.site_url.as_str()).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn parse_email(input: &str) -> Result<Email> {
    Email::parse(input).map_err(|e| AppError::Validation(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use sabriaz_core::{Money, UserId, UserRole};

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::stores::BearerToken;

    fn config() -> StorefrontConfig {
        StorefrontConfig::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn test_rehydrates_all_stores() {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        {
            let mut state = AppState::with_storage(config(), Arc::clone(&storage)).unwrap();
            state
                .cart_mut()
                .add_item(CartItem::new("p1", "Oud Noir", Money::from_rupees(500)));
            state.session.set_credentials(
                User {
                    id: UserId::new("u1"),
                    name: "Hira".to_string(),
                    email: "hira@example.com".to_string(),
                    role: UserRole::User,
                    created_at: None,
                },
                BearerToken::new("tok"),
            );
        }

        let state = AppState::with_storage(config(), storage).unwrap();
        assert_eq!(state.cart().state().total_amount(), Money::from_rupees(500));
        assert!(state.session().state().is_authenticated());
        assert!(state.catalog().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_requires_login() {
        let state = AppState::with_storage(config(), Arc::new(MemoryStorage::new())).unwrap();
        let err = state.cancel_order(&OrderId::new("o1")).await.unwrap_err();
        assert!(matches!(err, AppError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_subscribe_validates_before_sending() {
        let state = AppState::with_storage(config(), Arc::new(MemoryStorage::new())).unwrap();
        let err = state.subscribe("not-an-email").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_guest_with_no_orders_gets_empty_list() {
        let state = AppState::with_storage(config(), Arc::new(MemoryStorage::new())).unwrap();
        assert!(state.my_orders().await.unwrap().is_empty());
    }

    #[test]
    fn test_contact_link_uses_configured_phone() {
        let state = AppState::with_storage(config(), Arc::new(MemoryStorage::new())).unwrap();
        assert_eq!(
            state.contact_link("Hi").unwrap(),
            "https://wa.me/923399650031?text=Hi"
        );
        assert!(state.contact_link(" ").is_err());
    }

    #[test]
    fn test_sitemap_write_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("public");
        std::fs::write(&blocker, "not a directory").unwrap();

        let state = AppState::with_storage(config(), Arc::new(MemoryStorage::new())).unwrap();
        let target = blocker.join("sitemap.xml");
        let err = state.write_sitemap(&target).unwrap_err();

        match &err {
            AppError::Io { path, .. } => assert_eq!(path, &target),
            other => panic!("expected an I/O error, got {other:?}"),
        }
        assert!(err.is_server_side());

        let ok = dir.path().join("sitemap.xml");
        state.write_sitemap(&ok).unwrap();
        assert!(std::fs::read_to_string(ok).unwrap().contains("<urlset"));
    }
}
