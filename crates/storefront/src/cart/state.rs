//! Cart mirror plus the deletion-confirmation state machine.
//!
//! The workflow has two states: `Idle` (no pending record) and
//! `ConfirmPending` (exactly one). Requesting a new deletion while one is
//! pending overwrites it (last-writer-wins); confirming consumes the
//! record atomically, so a stray second confirm finds nothing to act on.

use crate::models::{CartItem, PendingDeletion};

/// Explicit cart state for one request: the freshly loaded cart mirror
/// and the session-held pending deletion, if any.
///
/// The cart is always replaced wholesale from the server, never patched.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Vec<CartItem>,
    pending: Option<PendingDeletion>,
}

/// Result of consuming the pending deletion against the current cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    /// The record still matches the cart; safe to act on.
    Validated(PendingDeletion),
    /// The cart changed since the modal opened; the record pointed at a
    /// different (or vanished) item and was discarded.
    Stale,
    /// There was nothing pending (already consumed or never requested).
    Nothing,
}

impl CartState {
    /// Build the state for this request.
    #[must_use]
    pub const fn new(cart: Vec<CartItem>, pending: Option<PendingDeletion>) -> Self {
        Self { cart, pending }
    }

    /// The current cart mirror.
    #[must_use]
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// The pending deletion, if the workflow is in `ConfirmPending`.
    #[must_use]
    pub const fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref()
    }

    /// `Idle -> ConfirmPending`: capture a deletion request for the item
    /// at `index`.
    ///
    /// Returns the item (for the confirmation message, resolved now, not
    /// later) and the captured record. Returns `None` when the index is
    /// out of range or the item carries no product kind; the state is
    /// left unchanged in that case.
    pub fn request_deletion(&mut self, index: usize) -> Option<(&CartItem, PendingDeletion)> {
        let item = self.cart.get(index)?;
        let product_id = item.product_id()?;
        let kind = item.kind()?;

        let record = PendingDeletion {
            index,
            product_id,
            kind,
        };
        self.pending = Some(record.clone());
        Some((item, record))
    }

    /// `ConfirmPending -> Idle` without acting (Cancel button, backdrop
    /// click, or modal dismissal).
    pub fn cancel_deletion(&mut self) {
        self.pending = None;
    }

    /// `ConfirmPending -> Idle`, consuming the record for execution.
    ///
    /// The record is cleared unconditionally - the workflow can never
    /// stick in `ConfirmPending` - and is only returned as `Validated`
    /// when the item at its index still carries the same product id and
    /// kind in the current cart.
    pub fn take_validated_deletion(&mut self) -> DeletionOutcome {
        let Some(record) = self.pending.take() else {
            return DeletionOutcome::Nothing;
        };

        let still_matches = self.cart.get(record.index).is_some_and(|item| {
            item.product_id() == Some(record.product_id) && item.kind() == Some(record.kind)
        });

        if still_matches {
            DeletionOutcome::Validated(record)
        } else {
            DeletionOutcome::Stale
        }
    }
}
