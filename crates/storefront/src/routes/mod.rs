//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home page
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (probes the shop service)
//!
//! # Cart (HTMX fragments)
//! GET  /cart                    - Cart page
//! GET  /cart/count              - Cart count badge (fragment)
//! POST /cart/remove/confirm     - Open the delete-confirmation modal
//! POST /cart/remove/cancel      - Close the modal without deleting
//! POST /cart/remove             - Confirm the pending deletion
//!
//! # Checkout
//! GET  /checkout/shipping       - Shipping-address modal (guarded by non-empty cart)
//! POST /checkout                - Submit shipping + purchase
//! ```

pub mod cart;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/remove/confirm", post(cart::remove_confirm))
        .route("/remove/cancel", post(cart::remove_cancel))
        .route("/remove", post(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/shipping", get(checkout::shipping_form))
        .route("/", post(checkout::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
}
