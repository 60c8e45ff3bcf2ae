//! OverSound Core - Shared domain types.
//!
//! This crate provides the domain vocabulary shared by the storefront
//! components:
//! - `storefront` - Public-facing cart and checkout frontend
//! - `integration-tests` - End-to-end tests against a fake backend
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product kinds and EUR money helpers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
