//! Cart client-state logic: summary arithmetic, the deletion-confirmation
//! state machine, and checkout eligibility/purchase building.
//!
//! Everything in here is pure over an explicit [`CartState`] snapshot so
//! it can be tested without a server; the route handlers own the I/O.

pub mod checkout;
pub mod state;
pub mod summary;

pub use checkout::{CheckoutError, Eligibility, build_purchase};
pub use state::{CartState, DeletionOutcome};
pub use summary::OrderSummary;
