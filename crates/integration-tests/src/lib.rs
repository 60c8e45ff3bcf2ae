//! Integration test harness for the OverSound storefront.
//!
//! Each test boots two in-process servers on ephemeral ports: a fake
//! shop & payment gateway (TPP) with scripted responses and a request
//! log, and the real storefront pointed at it. Tests then drive the
//! storefront over HTTP the way a browser running HTMX would, asserting
//! on the rendered fragments and on what actually reached the fake
//! service.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

use oversound_storefront::config::StorefrontConfig;
use oversound_storefront::middleware::create_session_layer;
use oversound_storefront::routes;
use oversound_storefront::state::AppState;

// =============================================================================
// Fake shop service
// =============================================================================

/// Scripted state and request log of the fake shop service.
#[derive(Default)]
pub struct FakeShopState {
    /// Cart returned by `GET /cart` and mutated by deletions.
    pub cart: Mutex<Vec<Value>>,
    /// Answer `GET /cart` with 401 (anonymous visitor).
    pub cart_unauthorized: AtomicBool,
    /// Answer `GET /cart` with 500 (degraded service).
    pub cart_error: AtomicBool,
    /// Payment methods returned by `GET /payment`.
    pub payment_methods: Mutex<Vec<Value>>,
    /// Answer `GET /payment` with 401.
    pub payment_unauthorized: AtomicBool,
    /// `Some((status, body))` makes `POST /purchase` fail.
    pub purchase_rejection: Mutex<Option<(u16, Value)>>,
    /// Recorded `DELETE /cart/{id}?type={t}` calls as `(id, t)`.
    pub deletes: Mutex<Vec<(i64, u8)>>,
    /// Recorded `POST /purchase` bodies.
    pub purchases: Mutex<Vec<Value>>,
}

#[derive(Deserialize)]
struct TypeQuery {
    #[serde(rename = "type")]
    kind: u8,
}

async fn get_cart(State(state): State<Arc<FakeShopState>>) -> Response {
    if state.cart_unauthorized.load(Ordering::SeqCst) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    if state.cart_error.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let cart = state.cart.lock().unwrap().clone();
    Json(Value::Array(cart)).into_response()
}

async fn delete_cart_item(
    State(state): State<Arc<FakeShopState>>,
    Path(id): Path<i64>,
    Query(query): Query<TypeQuery>,
) -> StatusCode {
    state.deletes.lock().unwrap().push((id, query.kind));

    let key = match query.kind {
        1 => "album_id",
        2 => "merch_id",
        _ => "song_id",
    };
    state
        .cart
        .lock()
        .unwrap()
        .retain(|item| item.get(key).and_then(Value::as_i64) != Some(id));

    StatusCode::OK
}

async fn get_payment_methods(State(state): State<Arc<FakeShopState>>) -> Response {
    if state.payment_unauthorized.load(Ordering::SeqCst) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let methods = state.payment_methods.lock().unwrap().clone();
    Json(Value::Array(methods)).into_response()
}

async fn post_purchase(
    State(state): State<Arc<FakeShopState>>,
    Json(body): Json<Value>,
) -> Response {
    state.purchases.lock().unwrap().push(body);

    if let Some((status, rejection)) = state.purchase_rejection.lock().unwrap().clone() {
        let status = StatusCode::from_u16(status).unwrap();
        return (status, Json(rejection)).into_response();
    }
    Json(json!({"status": "ok"})).into_response()
}

/// Start the fake shop service on an ephemeral port.
async fn spawn_fake_shop() -> (Url, Arc<FakeShopState>) {
    let state = Arc::new(FakeShopState::default());
    let app = Router::new()
        .route("/cart", get(get_cart))
        .route("/cart/{id}", delete(delete_cart_item))
        .route("/payment", get(get_payment_methods))
        .route("/purchase", post(post_purchase))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake shop listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Fake shop server error");
    });

    let url = format!("http://{addr}").parse().expect("valid URL");
    (url, state)
}

// =============================================================================
// Test context
// =============================================================================

/// One storefront instance wired to one fake shop service.
pub struct TestContext {
    /// Cookie-keeping HTTP client, so HTMX-style flows that span requests
    /// (confirm, then delete) share a session like a browser would.
    pub client: reqwest::Client,
    /// Base URL of the storefront under test.
    pub base_url: String,
    /// Handle to the fake shop service's state and request log.
    pub shop: Arc<FakeShopState>,
}

impl TestContext {
    /// Start a storefront with default configuration.
    pub async fn new() -> Self {
        Self::with_shipping(false).await
    }

    /// Start a storefront with the shipping extension toggled.
    pub async fn with_shipping(send_shipping: bool) -> Self {
        let (shop_url, shop) = spawn_fake_shop().await;

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            shop_url,
            media_url: "http://localhost:8081".parse().expect("valid URL"),
            send_shipping,
            sentry_dsn: None,
        };
        let state = AppState::new(config);
        let app = routes::routes()
            .layer(create_session_layer())
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Storefront server error");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: format!("http://{addr}"),
            shop,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request failed")
    }

    /// Replace the fake shop's cart.
    pub fn seed_cart(&self, items: Vec<Value>) {
        *self.shop.cart.lock().unwrap() = items;
    }

    /// Replace the fake shop's payment methods.
    pub fn seed_payment_methods(&self, methods: Vec<Value>) {
        *self.shop.payment_methods.lock().unwrap() = methods;
    }
}

// =============================================================================
// Fixture builders
// =============================================================================

#[must_use]
pub fn song(name: &str, price: &str, id: i64) -> Value {
    json!({"name": name, "price": price, "song_id": id})
}

#[must_use]
pub fn album(name: &str, price: &str, id: i64) -> Value {
    json!({"name": name, "price": price, "album_id": id})
}

#[must_use]
pub fn merch(name: &str, price: &str, id: i64) -> Value {
    json!({"name": name, "price": price, "merch_id": id})
}

#[must_use]
pub fn visa(id: i64, holder: &str) -> Value {
    json!({
        "id": id,
        "card_holder": holder,
        "card_number": "4111111111111111",
        "expire_month": 3,
        "expire_year": 2027,
    })
}
