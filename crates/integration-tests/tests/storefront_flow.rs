//! Shopper flows against the mock backend: sign-in, catalog, checkout, orders.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use sabriaz_core::{CustomerInfo, Money, OrderStatus, PaymentMethod, ProductId};
use sabriaz_integration_tests::{CUSTOMER_TOKEN, MockBackend, PASSWORD};
use sabriaz_storefront::api::catalog::NewReview;
use sabriaz_storefront::checkout::{CheckoutRequest, PAID_ORDER_FAILED, PaymentProof, TesterSelection};
use sabriaz_storefront::error::AppError;
use sabriaz_storefront::state::{AppState, LOGIN_FAILED};
use sabriaz_storefront::storage::{MemoryStorage, Storage};
use tokio_util::sync::CancellationToken;

fn customer() -> CustomerInfo {
    CustomerInfo {
        name: "Zara Ahmed".to_string(),
        phone: "03001234567".to_string(),
        address: "House 12, Street 4".to_string(),
        city: "Lahore".to_string(),
    }
}

fn shop(backend: &MockBackend, dir: &tempfile::TempDir) -> AppState {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    AppState::with_storage(backend.config(dir.path()), storage).unwrap()
}

async fn fill_cart(state: &mut AppState) {
    state.add_to_cart(&ProductId::new("p1")).await.unwrap();
    state.add_to_cart(&ProductId::new("p2")).await.unwrap();
    state.cart_mut().increase_quantity(&ProductId::new("p1"));
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);

    let err = state.login("zara@example.com", "wrong").await.unwrap_err();
    assert_eq!(err.user_message(LOGIN_FAILED), "Invalid credentials");
    assert!(!state.session().state().is_authenticated());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut state = AppState::new(backend.config(dir.path())).unwrap();
    let user = state.login(" Zara@Example.com ", PASSWORD).await.unwrap();
    assert_eq!(user.email.as_str(), "Zara@Example.com");

    // Trimmed, but otherwise the address the user typed.
    let sent = backend.requests_to("/api/auth/login");
    assert_eq!(sent[0].method, "POST");
    assert_eq!(sent[0].body["email"], "Zara@Example.com");

    let reloaded = AppState::new(backend.config(dir.path())).unwrap();
    let session = reloaded.session().state();
    assert!(session.is_authenticated());
    assert_eq!(session.token().unwrap().expose(), CUSTOMER_TOKEN);
}

#[tokio::test]
async fn test_register_keeps_typed_email() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);

    let err = state.register("Zara", "not-an-email", PASSWORD).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(backend.requests_to("/api/auth/register").is_empty());

    state.register(" Zara ", "  Zara.Ahmed@Example.com", PASSWORD).await.unwrap();
    let sent = backend.requests_to("/api/auth/register");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body["name"], "Zara");
    assert_eq!(sent[0].body["email"], "Zara.Ahmed@Example.com");
    assert!(state.session().state().is_authenticated());
}

#[tokio::test]
async fn test_catalog_ratings() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);

    state.refresh_catalog(&CancellationToken::new()).await.unwrap();

    let rating = |id: &str| state.catalog().get(&ProductId::new(id)).unwrap().rating;
    // 4.5 rounds up; no reviews and a failed lookup both count as unrated
    assert_eq!(rating("p1"), 5);
    assert_eq!(rating("p2"), 0);
    assert_eq!(rating("p3"), 0);
    assert_eq!(state.catalog().featured().count(), 1);
}

#[tokio::test]
async fn test_guest_cash_on_delivery_checkout() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);
    fill_cart(&mut state).await;

    // List prices: 2 x 4500 + 3200
    assert_eq!(state.cart().state().total_amount(), Money::from_rupees(12_200));

    let request = CheckoutRequest {
        customer: customer(),
        testers: TesterSelection::from_names(["Rose", "Musk"]).unwrap(),
        notes: "  Ring the bell  ".to_string(),
        ..CheckoutRequest::default()
    };
    let order = state.checkout(&request).await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, Money::from_rupees(12_200));
    assert!(state.cart().state().is_empty());
    assert_eq!(state.guest_orders().ids(), &[order.id.clone()]);

    let sent = backend.requests_to("/api/orders");
    assert_eq!(sent.len(), 1);
    assert!(sent[0].authorization.is_none());
    let body = &sent[0].body;
    assert_eq!(body["paymentMethod"], "cod");
    assert!(body["paymentProofUrl"].is_null());
    assert_eq!(body["notes"], "Ring the bell");
    assert_eq!(body["testers"], serde_json::json!(["Rose", "Musk"]));
    assert_eq!(body["items"][0]["productId"], "p1");
    assert_eq!(body["items"][0]["quantity"], 2);
    assert_eq!(body["total"], 12_200.0);

    let mine = state.my_orders().await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, order.id);

    // Stored lines carry the backend's purchase-time snapshot.
    let line = &mine[0].items[0];
    assert_eq!(line.product_id.as_ref().unwrap().as_str(), "p1");
    assert_eq!(line.name, "Oud Noir");
    assert_eq!(line.price_at_purchase, Some(Money::from_rupees(4500)));
    assert_eq!(line.discount_percent_at_purchase.unwrap().to_string(), "10");
    assert_eq!(line.line_total(), Some(Money::from_rupees(9000)));
}

#[tokio::test]
async fn test_failed_order_keeps_cart() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);
    fill_cart(&mut state).await;
    backend.state().fail_orders = true;

    let request = CheckoutRequest {
        customer: customer(),
        ..CheckoutRequest::default()
    };
    let err = state.checkout(&request).await.unwrap_err();

    assert_eq!(err.user_message(request.failure_message()), "Product out of stock");
    assert_eq!(state.cart().state().total_quantity(), 3);
    assert!(state.guest_orders().ids().is_empty());
}

#[tokio::test]
async fn test_empty_cart_sends_nothing() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);

    let request = CheckoutRequest {
        customer: customer(),
        ..CheckoutRequest::default()
    };
    let err = state.checkout(&request).await.unwrap_err();

    assert!(matches!(err, AppError::Checkout(_)));
    assert_eq!(err.user_message("unused"), "Your cart is empty");
    assert!(backend.requests_to("/api/orders").is_empty());
}

#[tokio::test]
async fn test_prepaid_checkout_uploads_proof() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);
    fill_cart(&mut state).await;

    let request = CheckoutRequest {
        customer: customer(),
        payment_method: PaymentMethod::Jazzcash,
        payment_proof: Some(PaymentProof::Bytes {
            file_name: "receipt.png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }),
        ..CheckoutRequest::default()
    };
    let order = state.checkout(&request).await.unwrap();

    assert_eq!(
        order.payment_proof_url.as_deref(),
        Some("https://img.example/receipt.png")
    );

    let uploads = backend.state().uploads.clone();
    assert_eq!(uploads.len(), 1);
    assert!(uploads[0].contains(&("upload_preset".to_string(), "unsigned-preset".to_string())));
    assert!(uploads[0].contains(&("file".to_string(), "receipt.png".to_string())));

    let body = &backend.requests_to("/api/orders")[0].body;
    assert_eq!(body["paymentMethod"], "jazzcash");
    assert_eq!(body["paymentProofUrl"], "https://img.example/receipt.png");
}

#[tokio::test]
async fn test_prepaid_without_proof_is_rejected_locally() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);
    fill_cart(&mut state).await;

    let request = CheckoutRequest {
        customer: customer(),
        payment_method: PaymentMethod::BankTransfer,
        ..CheckoutRequest::default()
    };
    assert_eq!(request.failure_message(), PAID_ORDER_FAILED);
    let err = state.checkout(&request).await.unwrap_err();

    assert!(matches!(err, AppError::Checkout(_)));
    assert!(backend.state().uploads.is_empty());
    assert_eq!(state.cart().state().total_quantity(), 3);
}

#[tokio::test]
async fn test_signed_in_checkout_and_cancel() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);
    state.login("zara@example.com", PASSWORD).await.unwrap();
    fill_cart(&mut state).await;

    let request = CheckoutRequest {
        customer: customer(),
        ..CheckoutRequest::default()
    };
    let order = state.checkout(&request).await.unwrap();

    let sent = backend.requests_to("/api/orders");
    assert_eq!(
        sent[0].authorization.as_deref(),
        Some(format!("Bearer {CUSTOMER_TOKEN}").as_str())
    );
    // Account orders are not tracked as guest orders.
    assert!(state.guest_orders().ids().is_empty());

    state.cancel_order(&order.id).await.unwrap();
    let mine = state.my_orders().await.unwrap();
    assert_eq!(mine[0].status, OrderStatus::Cancelled);

    // A second cancel is refused by the backend.
    let err = state.cancel_order(&order.id).await.unwrap_err();
    assert_eq!(err.user_message("Cancel failed"), "Order cannot be cancelled");
}

#[tokio::test]
async fn test_cancel_requires_sign_in() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = shop(&backend, &dir);

    let err = state
        .cancel_order(&sabriaz_core::OrderId::new("65f0c1d20001"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));
}

#[tokio::test]
async fn test_duplicate_subscription() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = shop(&backend, &dir);

    state.subscribe("fan@example.com").await.unwrap();
    let err = state.subscribe("FAN@example.com").await.unwrap_err();
    assert_eq!(err.user_message("Subscription failed"), "Already subscribed");
}

#[tokio::test]
async fn test_content_reads_are_anonymous_gets() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut state = shop(&backend, &dir);
    // Signed in, yet public reads still carry no token.
    state.login("zara@example.com", PASSWORD).await.unwrap();
    let api = state.api();

    let settings = api.site_settings().await.unwrap();
    assert_eq!(settings.home_banner_title, "Eid Collection");
    assert_eq!(settings.global_offer_text, "Free delivery over Rs. 5000");
    assert!(settings.home_banner_subtitle.is_empty());

    let about = api.about_content().await.unwrap();
    assert_eq!(about.title, "About Sabriaz");
    assert!(about.vision.is_empty());

    let tiles = api.showcase_categories().await.unwrap();
    assert_eq!(tiles.len(), 2);
    assert_eq!(tiles[0].display_name, "For Him");
    assert_eq!(tiles[1].category.as_ref().unwrap().id().as_str(), "c-women");

    let testers = api.list_testers().await.unwrap();
    let names: Vec<&str> = testers.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Rose", "Musk"]);

    for path in ["/api/settings", "/api/about", "/api/showcase-categories", "/api/testers"] {
        let sent = backend.requests_to(path);
        assert_eq!(sent.len(), 1, "{path}");
        assert_eq!(sent[0].method, "GET", "{path}");
        assert!(sent[0].authorization.is_none(), "{path}");
        assert!(sent[0].body.is_null(), "{path}");
    }
}

#[tokio::test]
async fn test_category_page_reads_by_slug() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = shop(&backend, &dir);
    let api = state.api();

    let category = api.category_by_slug("women").await.unwrap();
    assert_eq!(category.id.as_str(), "c-women");

    let products = api.products_by_category_slug("women").await.unwrap();
    let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["p2", "p3"]);

    let sent = backend.requests_to("/api/categories/women");
    assert_eq!(sent[0].method, "GET");
    assert!(sent[0].authorization.is_none());
    let sent = backend.requests_to("/api/products?slug=women");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "GET");

    // Slugs are a single encoded segment or query value.
    let err = api.category_by_slug("gift sets").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(backend.requests_to("/api/categories/gift%20sets").len(), 1);
    assert!(api.products_by_category_slug("a&b").await.unwrap().is_empty());
    assert_eq!(backend.requests_to("/api/products?slug=a%26b").len(), 1);
}

#[tokio::test]
async fn test_submit_review() {
    let backend = MockBackend::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = shop(&backend, &dir);

    let review = NewReview::new(ProductId::new("p2"), 4, "  Warm and soft ", None).unwrap();
    state.submit_review(&review).await.unwrap();

    let sent = backend.requests_to("/api/reviews");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, "POST");
    assert!(sent[0].authorization.is_none());
    assert_eq!(
        sent[0].body,
        serde_json::json!({
            "productId": "p2",
            "rating": 4,
            "comment": "Warm and soft",
            "customerName": "Anonymous"
        })
    );
}
