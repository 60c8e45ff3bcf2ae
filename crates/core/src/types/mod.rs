//! Core types for OverSound.

pub mod kind;
pub mod money;

pub use kind::ProductKind;
pub use money::{VAT_RATE, format_eur};
