//! Authentication cookie extraction.
//!
//! Session issuance lives in the user-session microservice; the
//! storefront only forwards the visitor's `oversound_auth` cookie on
//! every shop-service call. Anonymous visitors simply have no token, and
//! the shop service answers 401 - which the cart page treats as an empty
//! cart, not an error.

use axum::{extract::FromRequestParts, http::request::Parts};

/// Name of the session cookie issued by the user-session service.
pub const AUTH_COOKIE: &str = "oversound_auth";

/// Extractor for the visitor's auth token, if any.
///
/// Never rejects: handlers decide what an anonymous visitor sees.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(AuthToken(token): AuthToken) -> impl IntoResponse {
///     let cart = state.shop().load_cart_or_empty(token.as_deref()).await;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthToken(pub Option<String>);

impl AuthToken {
    /// The token as a borrowed str, ready for the shop client.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S> FromRequestParts<S> for AuthToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get_all(axum::http::header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|header| header.split(';'))
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == AUTH_COOKIE).then(|| value.to_string())
            })
            .next();

        Ok(Self(token))
    }
}
