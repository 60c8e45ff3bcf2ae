//! Session-stored types.
//!
//! The only thing the storefront keeps in the session is the pending
//! deletion record bridging the confirm-modal round trip; everything else
//! is re-fetched from the shop service on every request.

use serde::{Deserialize, Serialize};

use oversound_core::ProductKind;

/// The single in-flight deletion confirmation.
///
/// Captured when the visitor clicks a remove control and cleared when the
/// modal closes or the deletion resolves. At most one exists per session;
/// opening a second confirmation overwrites the first (last-writer-wins).
///
/// The `index` is a local handle into the cart snapshot the modal was
/// opened against, not a persisted identifier - before acting, the record
/// is re-validated against the freshly loaded cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDeletion {
    /// Position of the item in the cart at the moment the modal opened.
    pub index: usize,
    /// Kind-specific product id.
    pub product_id: i64,
    /// Product kind (determines the `type` code on the DELETE).
    pub kind: ProductKind,
}

/// Session keys.
pub mod session_keys {
    /// Key for the pending deletion confirmation record.
    pub const PENDING_DELETION: &str = "pending_deletion";
}
