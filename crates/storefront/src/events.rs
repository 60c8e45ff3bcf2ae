//! Cart-changed notifications.
//!
//! Two halves of the same signal:
//!
//! - In-process, [`CartEvents`] is a typed broadcast channel; mutating
//!   handlers publish exactly one [`CartEvent::Updated`] per successful
//!   mutation and any component (or test) can subscribe.
//! - Browser-side, the same handlers attach an `HX-Trigger` response
//!   header named [`CART_UPDATED`]; the header cart badge listens for it
//!   and re-fetches `GET /cart/count`.

use tokio::sync::broadcast;

/// HTMX trigger name announced after every successful cart mutation.
pub const CART_UPDATED: &str = "cart-updated";

/// Channel capacity; events carry no payload, so lagging subscribers just
/// coalesce into a re-fetch.
const EVENT_CAPACITY: usize = 16;

/// A cart-related notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// The server-side cart changed; local mirrors are stale.
    Updated,
}

/// Publish/subscribe handle for cart events.
#[derive(Debug, Clone)]
pub struct CartEvents {
    sender: broadcast::Sender<CartEvent>,
}

impl CartEvents {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Announce that the cart changed. Fine to call with no subscribers.
    pub fn publish_updated(&self) {
        let _ = self.sender.send(CartEvent::Updated);
    }

    /// Subscribe to future cart events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.sender.subscribe()
    }
}

impl Default for CartEvents {
    fn default() -> Self {
        Self::new()
    }
}
