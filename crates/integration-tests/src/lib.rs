//! End-to-end tests for the Sabriaz clients.
//!
//! [`MockBackend`] is an in-process axum server speaking the subset of the
//! Sabriaz REST API (plus the asset host's upload endpoint) the clients use.
//! It keeps orders in memory and records the requests tests assert on.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p sabriaz-integration-tests
//! ```
//!
//! # Accounts
//!
//! - Any email with password `secret` signs in; `owner@...` gets the admin
//!   role and the token `admin-token`, everyone else `customer-token`

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Multipart, OriginalUri, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use sabriaz_storefront::config::{StorefrontConfig, UploadConfig};
use serde_json::{Value, json};

/// Token handed to admin accounts.
pub const ADMIN_TOKEN: &str = "admin-token";

/// Token handed to customer accounts.
pub const CUSTOMER_TOKEN: &str = "customer-token";

/// Password every mock account accepts.
pub const PASSWORD: &str = "secret";

/// A request the mock saw.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// A stored order and the token that placed it.
#[derive(Debug, Clone)]
struct StoredOrder {
    owner: Option<String>,
    order: Value,
}

/// Mutable backend state.
#[derive(Debug, Default)]
pub struct MockState {
    orders: Vec<StoredOrder>,
    pub requests: Vec<Recorded>,
    /// Text fields and file name of each upload.
    pub uploads: Vec<Vec<(String, String)>>,
    pub subscribers: Vec<String>,
    /// Reject every order with a 400 and a server message.
    pub fail_orders: bool,
    /// Site settings saved by an admin, replacing the fixture.
    pub settings: Option<Value>,
    /// About page saved by an admin, replacing the fixture.
    pub about: Option<Value>,
}

type Shared = Arc<Mutex<MockState>>;

/// Running mock backend.
pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
}

impl MockBackend {
    /// Bind to an ephemeral port and serve in the background.
    pub async fn start() -> Self {
        let state = Shared::default();
        let app = router(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, state }
    }

    #[must_use]
    pub fn base_url(&self) -> url::Url {
        url::Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    /// Lock the backend state for inspection or tweaking.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Requests recorded for a path, including any query string.
    #[must_use]
    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Storefront config pointing at this backend, with uploads enabled.
    #[must_use]
    pub fn config(&self, storage_dir: &std::path::Path) -> StorefrontConfig {
        let base = self.base_url().to_string();
        let dir = storage_dir.display().to_string();
        let mut config = StorefrontConfig::from_lookup(|key| match key {
            "SABRIAZ_API_BASE_URL" => Some(base.clone()),
            "SABRIAZ_STORAGE_DIR" => Some(dir.clone()),
            _ => None,
        })
        .unwrap();

        let mut uploads =
            UploadConfig::new("sabriaz-test", secrecy::SecretString::from("unsigned-preset")).unwrap();
        uploads.endpoint = self.base_url().join("upload").unwrap();
        config.uploads = Some(uploads);
        config
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/products", get(products).post(create_product))
        .route(
            "/api/products/{id}",
            get(product).put(update_product).delete(delete_item),
        )
        .route("/api/categories", get(categories).post(create_category))
        .route(
            "/api/categories/{slug}",
            get(category_by_slug).put(update_category).delete(delete_item),
        )
        .route("/api/reviews", post(create_review))
        .route("/api/reviews/{id}", get(reviews))
        .route(
            "/api/showcase-categories",
            get(showcase).post(create_showcase),
        )
        .route(
            "/api/showcase-categories/{id}",
            put(update_showcase).delete(delete_item),
        )
        .route("/api/testers", get(testers).post(create_tester))
        .route("/api/testers/{id}", delete(delete_item))
        .route("/api/settings", get(settings).put(update_settings))
        .route("/api/about", get(about).put(update_about))
        .route("/api/users", get(users))
        .route("/api/orders", get(all_orders).post(create_order))
        .route("/api/orders/my", get(my_orders))
        .route("/api/orders/guest", post(guest_orders))
        .route("/api/orders/{id}/cancel", patch(cancel_order))
        .route("/api/orders/{id}/status", patch(set_status))
        .route("/api/orders/{id}/payment", patch(set_payment))
        .route("/api/subscribe", post(subscribe))
        .route("/upload", post(upload))
        .with_state(state)
}

// =============================================================================
// Fixtures
// =============================================================================

fn catalog() -> Value {
    json!([
        {
            "_id": "p1",
            "name": "Oud Noir",
            "description": "Smoky oud with rose",
            "price": 4500,
            "discountPercent": 10,
            "stock": 12,
            "category": {"_id": "c-men", "name": "Men", "slug": "men"},
            "images": ["https://img.example/oud.jpg"],
            "isFeatured": true
        },
        {
            "_id": "p2",
            "name": "Amber Bloom",
            "description": "Warm amber",
            "price": 3200,
            "stock": 4,
            "category": "c-women",
            "images": []
        },
        {
            "_id": "p3",
            "name": "Citrus Veil",
            "price": 2800,
            "discountPercent": 25,
            "category": "c-women"
        }
    ])
}

fn category_list() -> Value {
    json!([
        {"_id": "c-men", "name": "Men", "slug": "men"},
        {"_id": "c-women", "name": "Women", "slug": "women"}
    ])
}

fn settings_fixture() -> Value {
    json!({
        "_id": "settings",
        "homeBannerImage": "https://img.example/banner.jpg",
        "homeBannerTitle": "Eid Collection",
        "homeBannerLink": "/category/men",
        "globalOfferText": "Free delivery over Rs. 5000"
    })
}

fn about_fixture() -> Value {
    json!({
        "title": "About Sabriaz",
        "subtitle": "Perfumes from Lahore",
        "mission": "Luxury scents at honest prices"
    })
}

fn user_for(email: &str, name: &str) -> (Value, &'static str) {
    let admin = email.starts_with("owner@");
    let user = json!({
        "_id": if admin { "u-admin" } else { "u-customer" },
        "name": name,
        "email": email,
        "role": if admin { "admin" } else { "user" },
    });
    (user, if admin { ADMIN_TOKEN } else { CUSTOMER_TOKEN })
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn record(state: &Shared, method: &'static str, path: String, headers: &HeaderMap, body: Value) {
    state.lock().unwrap().requests.push(Recorded {
        method,
        path,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

/// `base` with every field of `patch` written over it.
fn merged(base: Value, patch: &Value) -> Value {
    let mut out = base;
    if let (Some(out_fields), Some(patch_fields)) = (out.as_object_mut(), patch.as_object()) {
        for (key, value) in patch_fields {
            out_fields.insert(key.clone(), value.clone());
        }
    }
    out
}

/// Record a back-office write and answer it when the admin token is present.
fn admin_write(
    state: &Shared,
    method: &'static str,
    uri: &Uri,
    headers: &HeaderMap,
    body: Value,
    reply: impl FnOnce(&Value) -> Value,
) -> Response {
    record(state, method, uri.to_string(), headers, body.clone());
    if bearer(headers).as_deref() != Some(ADMIN_TOKEN) {
        return error(StatusCode::FORBIDDEN, "Admin only");
    }
    Json(reply(&body)).into_response()
}

/// Record a public read.
fn public_read(state: &Shared, uri: &Uri, headers: &HeaderMap) {
    record(state, "GET", uri.to_string(), headers, Value::Null);
}

// =============================================================================
// Handlers
// =============================================================================

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    record(&state, "POST", "/api/auth/login".to_string(), &headers, body.clone());
    if body["password"] != PASSWORD {
        return error(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }
    let email = body["email"].as_str().unwrap_or_default();
    let (user, token) = user_for(email, "Mock User");
    Json(json!({ "user": user, "token": token })).into_response()
}

async fn register(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST", "/api/auth/register".to_string(), &headers, body.clone());
    let email = body["email"].as_str().unwrap_or_default();
    if email == "taken@example.com" {
        return error(StatusCode::BAD_REQUEST, "User already exists");
    }
    let (user, token) = user_for(email, body["name"].as_str().unwrap_or_default());
    Json(json!({ "user": user, "token": token })).into_response()
}

async fn products(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    public_read(&state, &uri, &headers);
    let Some(slug) = query.get("slug") else {
        return Json(catalog());
    };
    let category_id = format!("c-{slug}");
    let matching: Vec<Value> = catalog()
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter(|p| {
            p["category"]["slug"] == slug.as_str() || p["category"] == category_id.as_str()
        })
        .collect();
    Json(Value::Array(matching))
}

async fn create_product(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_write(&state, "POST", &uri, &headers, body, |body| {
        merged(json!({"_id": "p-new"}), body)
    })
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_write(&state, "PUT", &uri, &headers, body, |body| {
        let existing = catalog()
            .as_array()
            .and_then(|all| all.iter().find(|p| p["_id"] == id.as_str()).cloned())
            .unwrap_or_else(|| json!({"_id": id, "name": "", "price": 0}));
        merged(existing, body)
    })
}

/// `DELETE` on any back-office collection item.
async fn delete_item(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    admin_write(&state, "DELETE", &uri, &headers, Value::Null, |_| {
        json!({"message": "Deleted"})
    })
}

async fn product(Path(id): Path<String>) -> Response {
    catalog()
        .as_array()
        .and_then(|all| all.iter().find(|p| p["_id"] == id.as_str()).cloned())
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Product not found"),
            |p| Json(p).into_response(),
        )
}

async fn categories() -> Json<Value> {
    Json(category_list())
}

async fn category_by_slug(
    State(state): State<Shared>,
    Path(slug): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    public_read(&state, &uri, &headers);
    category_list()
        .as_array()
        .and_then(|all| all.iter().find(|c| c["slug"] == slug.as_str()).cloned())
        .map_or_else(
            || error(StatusCode::NOT_FOUND, "Category not found"),
            |c| Json(c).into_response(),
        )
}

async fn create_category(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_write(&state, "POST", &uri, &headers, body, |body| {
        let name = body["name"].as_str().unwrap_or_default();
        json!({"_id": "c-new", "name": name, "slug": name.to_lowercase()})
    })
}

async fn update_category(
    State(state): State<Shared>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_write(&state, "PUT", &uri, &headers, body, |body| {
        let name = body["name"].as_str().unwrap_or_default();
        json!({"_id": id, "name": name, "slug": name.to_lowercase()})
    })
}

async fn reviews(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "p1" => Json(json!([
            {"_id": "r1", "productId": "p1", "rating": 5, "comment": "Lovely", "customerName": "Hira"},
            {"_id": "r2", "productId": "p1", "rating": 4, "comment": "Lasts all day"}
        ]))
        .into_response(),
        "p3" => error(StatusCode::INTERNAL_SERVER_ERROR, "Review store unavailable"),
        _ => Json(json!([])).into_response(),
    }
}

async fn create_review(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST", "/api/reviews".to_string(), &headers, body.clone());
    let rating_ok = body["rating"].as_u64().is_some_and(|r| (1..=5).contains(&r));
    if body["productId"].as_str().is_none() || !rating_ok {
        return error(StatusCode::BAD_REQUEST, "Invalid review");
    }
    (StatusCode::CREATED, Json(merged(json!({"_id": "r-new"}), &body))).into_response()
}

async fn showcase(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Json<Value> {
    public_read(&state, &uri, &headers);
    Json(json!([
        {
            "_id": "s1",
            "displayName": "For Him",
            "image": "https://img.example/him.jpg",
            "category": {"_id": "c-men", "name": "Men", "slug": "men"}
        },
        {
            "_id": "s2",
            "displayName": "For Her",
            "image": "https://img.example/her.jpg",
            "category": "c-women"
        }
    ]))
}

async fn create_showcase(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_write(&state, "POST", &uri, &headers, body, |body| {
        merged(json!({"_id": "s-new"}), body)
    })
}

async fn update_showcase(
    State(state): State<Shared>,
    Path(id): Path<String>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_write(&state, "PUT", &uri, &headers, body, |body| {
        merged(json!({"_id": id}), body)
    })
}

async fn testers(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Json<Value> {
    public_read(&state, &uri, &headers);
    Json(json!([
        {"_id": "t1", "name": "Rose"},
        {"_id": "t2", "name": "Musk"}
    ]))
}

async fn create_tester(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_write(&state, "POST", &uri, &headers, body, |body| {
        json!({"_id": "t-new", "name": body["name"]})
    })
}

async fn settings(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Json<Value> {
    public_read(&state, &uri, &headers);
    let saved = state.lock().unwrap().settings.clone();
    Json(saved.unwrap_or_else(settings_fixture))
}

async fn update_settings(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let response = admin_write(&state, "PUT", &uri, &headers, body.clone(), Value::clone);
    if response.status().is_success() {
        state.lock().unwrap().settings = Some(body);
    }
    response
}

async fn about(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Json<Value> {
    public_read(&state, &uri, &headers);
    let saved = state.lock().unwrap().about.clone();
    Json(saved.unwrap_or_else(about_fixture))
}

async fn update_about(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let response = admin_write(&state, "PUT", &uri, &headers, body.clone(), Value::clone);
    if response.status().is_success() {
        state.lock().unwrap().about = Some(body);
    }
    response
}

async fn users(
    State(state): State<Shared>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Response {
    record(&state, "GET", uri.to_string(), &headers, Value::Null);
    if bearer(&headers).as_deref() != Some(ADMIN_TOKEN) {
        return error(StatusCode::FORBIDDEN, "Admin only");
    }
    Json(json!([
        {
            "_id": "u-admin",
            "name": "Owner",
            "email": "owner@sabriaz.com",
            "role": "admin",
            "createdAt": "2025-01-05T09:00:00.000Z"
        },
        {
            "_id": "u-customer",
            "name": "Zara Ahmed",
            "email": "zara@example.com",
            "role": "user",
            "createdAt": "2025-02-11T16:30:00.000Z"
        }
    ]))
    .into_response()
}

async fn create_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "POST", "/api/orders".to_string(), &headers, body.clone());

    let mut guard = state.lock().unwrap();
    if guard.fail_orders {
        return error(StatusCode::BAD_REQUEST, "Product out of stock");
    }

    // Lines are stored the way the real backend keeps them: a product
    // reference plus the price and discount in force at purchase time.
    let catalog = catalog();
    let items: Vec<Value> = body["items"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|line| {
            let product = catalog
                .as_array()
                .and_then(|all| all.iter().find(|p| p["_id"] == line["productId"]))
                .cloned()
                .unwrap_or(Value::Null);
            json!({
                "product": line["productId"],
                "name": product["name"],
                "quantity": line["quantity"],
                "priceAtPurchase": product["price"],
                "discountPercentAtPurchase": product.get("discountPercent").cloned().unwrap_or(json!(0)),
            })
        })
        .collect();

    let id = format!("65f0c1d2{:04}", guard.orders.len() + 1);
    let order = json!({
        "_id": id,
        "customerInfo": body["customerInfo"],
        "items": items,
        "testers": body["testers"],
        "notes": body["notes"],
        "subtotal": body["subtotal"],
        "discountTotal": body["discountTotal"],
        "total": body["total"],
        "paymentMethod": body["paymentMethod"],
        "paymentProofUrl": body["paymentProofUrl"],
        "status": "pending",
        "paymentStatus": "unpaid",
        "createdAt": "2025-03-01T10:00:00.000Z"
    });
    guard.orders.push(StoredOrder {
        owner: bearer(&headers),
        order: order.clone(),
    });
    (StatusCode::CREATED, Json(order)).into_response()
}

async fn my_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let Some(token) = bearer(&headers) else {
        return error(StatusCode::UNAUTHORIZED, "Not authorized");
    };
    let guard = state.lock().unwrap();
    let mine: Vec<Value> = guard
        .orders
        .iter()
        .filter(|o| o.owner.as_deref() == Some(token.as_str()))
        .map(|o| o.order.clone())
        .collect();
    Json(Value::Array(mine)).into_response()
}

async fn guest_orders(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let ids = body["ids"].as_array().cloned().unwrap_or_default();
    let guard = state.lock().unwrap();
    let found: Vec<Value> = guard
        .orders
        .iter()
        .filter(|o| ids.contains(&o.order["_id"]))
        .map(|o| o.order.clone())
        .collect();
    Json(Value::Array(found))
}

async fn all_orders(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if bearer(&headers).as_deref() != Some(ADMIN_TOKEN) {
        return error(StatusCode::FORBIDDEN, "Admin only");
    }
    let guard = state.lock().unwrap();
    let all: Vec<Value> = guard.orders.iter().map(|o| o.order.clone()).collect();
    Json(Value::Array(all)).into_response()
}

async fn cancel_order(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, "PATCH", format!("/api/orders/{id}/cancel"), &headers, Value::Null);
    let Some(token) = bearer(&headers) else {
        return error(StatusCode::UNAUTHORIZED, "Not authorized");
    };
    let mut guard = state.lock().unwrap();
    let Some(stored) = guard
        .orders
        .iter_mut()
        .find(|o| o.order["_id"] == id.as_str() && o.owner.as_deref() == Some(token.as_str()))
    else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    if !matches!(stored.order["status"].as_str(), Some("pending" | "processing")) {
        return error(StatusCode::BAD_REQUEST, "Order cannot be cancelled");
    }
    stored.order["status"] = json!("cancelled");
    Json(stored.order.clone()).into_response()
}

fn admin_update(state: &Shared, headers: &HeaderMap, id: &str, field: &str, value: &Value) -> Response {
    if bearer(headers).as_deref() != Some(ADMIN_TOKEN) {
        return error(StatusCode::FORBIDDEN, "Admin only");
    }
    let mut guard = state.lock().unwrap();
    let Some(stored) = guard.orders.iter_mut().find(|o| o.order["_id"] == id) else {
        return error(StatusCode::NOT_FOUND, "Order not found");
    };
    stored.order[field] = value.clone();
    Json(stored.order.clone()).into_response()
}

async fn set_status(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "PATCH", format!("/api/orders/{id}/status"), &headers, body.clone());
    admin_update(&state, &headers, &id, "status", &body["status"])
}

async fn set_payment(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, "PATCH", format!("/api/orders/{id}/payment"), &headers, body.clone());
    admin_update(&state, &headers, &id, "paymentStatus", &body["paymentStatus"])
}

async fn subscribe(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let mut guard = state.lock().unwrap();
    if guard.subscribers.contains(&email) {
        return error(StatusCode::BAD_REQUEST, "Already subscribed");
    }
    guard.subscribers.push(email);
    Json(json!({"message": "Subscribed"})).into_response()
}

async fn upload(State(state): State<Shared>, mut multipart: Multipart) -> Response {
    let mut fields = Vec::new();
    let mut file_name = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            file_name = field.file_name().map(str::to_string);
            let _ = field.bytes().await;
            fields.push((name, file_name.clone().unwrap_or_default()));
        } else {
            let value = field.text().await.unwrap_or_default();
            fields.push((name, value));
        }
    }
    state.lock().unwrap().uploads.push(fields);

    match file_name {
        Some(file_name) => {
            Json(json!({"secure_url": format!("https://img.example/{file_name}")})).into_response()
        }
        None => error(StatusCode::BAD_REQUEST, "Missing file"),
    }
}
