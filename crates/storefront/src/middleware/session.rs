//! Session middleware configuration.
//!
//! Sessions carry exactly one datum, the pending-deletion record of the
//! cart's confirmation modal, so an in-memory store is enough; losing it
//! on restart only closes an open modal.

use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Session cookie name for the storefront.
pub const SESSION_COOKIE_NAME: &str = "oversound_storefront_session";

/// Session expiry time in seconds (30 minutes of inactivity; a pending
/// deletion older than that is long stale anyway).
const SESSION_EXPIRY_SECONDS: i64 = 30 * 60;

/// Create the session layer with an in-memory store.
#[must_use]
pub fn create_session_layer() -> SessionManagerLayer<MemoryStore> {
    let store = MemoryStore::default();

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        // The storefront terminates plain HTTP behind the reverse proxy
        .with_secure(false)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
