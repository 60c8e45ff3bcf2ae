//! Home page.
//!
//! The purchase-success flow redirects here; everything else on the home
//! page lives in other parts of the storefront.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate;

/// Display the home page.
pub async fn home() -> impl IntoResponse {
    HomeTemplate
}
