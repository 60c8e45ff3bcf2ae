//! Request extractors and middleware configuration.

pub mod auth;
pub mod session;

pub use auth::{AUTH_COOKIE, AuthToken};
pub use session::create_session_layer;
