//! Cart page and deletion-workflow handlers.
//!
//! The page is server-rendered; mutations go through HTMX fragments. The
//! cart is re-fetched from the shop service on every request and every
//! display field is re-derived from scratch, so a full reload always
//! produces a correct page regardless of prior DOM state.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use axum::Form;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use url::Url;

use oversound_core::{ProductKind, format_eur};

use crate::cart::{CartState, DeletionOutcome, Eligibility, OrderSummary};
use crate::error::Result;
use crate::events;
use crate::filters;
use crate::middleware::AuthToken;
use crate::models::{CartItem, PaymentMethod, PendingDeletion, session_keys};
use crate::state::AppState;

// =============================================================================
// View types
// =============================================================================

/// Cart item display data for templates.
///
/// Every field is derived fresh from the current item on each render; the
/// remove control carries the item's local index plus the id and numeric
/// kind code the deletion workflow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub index: usize,
    pub name: String,
    pub kind_label: String,
    pub image_url: String,
    pub price: String,
    pub removable: bool,
    pub product_id: i64,
    pub type_code: u8,
}

/// Cart display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub tax: String,
    pub total: String,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::build(&[], None)
    }

    /// Derive the full view from a cart snapshot.
    ///
    /// `media_url` is the base of the media service hosting cover images;
    /// `None` (tests) falls back to the kind default for every item.
    #[must_use]
    pub fn build(cart: &[CartItem], media_url: Option<&Url>) -> Self {
        let summary = OrderSummary::of(cart);
        Self {
            items: cart
                .iter()
                .enumerate()
                .map(|(index, item)| CartItemView::derive(index, item, media_url))
                .collect(),
            subtotal: format_eur(summary.subtotal),
            tax: format_eur(summary.tax),
            total: format_eur(summary.total),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl CartItemView {
    fn derive(index: usize, item: &CartItem, media_url: Option<&Url>) -> Self {
        let kind = item.kind();
        Self {
            index,
            name: item.name.clone(),
            kind_label: kind.map_or("Producto", ProductKind::label).to_string(),
            image_url: image_url(item, media_url),
            price: format_eur(item.price),
            removable: kind.is_some() && item.product_id().is_some(),
            product_id: item.product_id().unwrap_or_default(),
            type_code: kind.map_or(0, ProductKind::code),
        }
    }
}

/// Resolve an item's image: its cover on the media service when present,
/// else the kind-specific default placeholder.
fn image_url(item: &CartItem, media_url: Option<&Url>) -> String {
    let fallback = item
        .kind()
        .unwrap_or(ProductKind::Song)
        .default_cover()
        .to_string();

    match (&item.cover, media_url) {
        (Some(cover), Some(base)) if !cover.is_empty() => {
            if cover.starts_with('/') {
                format!("{base}static{cover}")
            } else {
                format!("{base}static/{cover}")
            }
        }
        _ => fallback,
    }
}

/// Payment method display data for templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethodView {
    pub id: i64,
    pub holder: String,
    pub last_four: String,
    pub expiry: String,
    pub brand: String,
    /// First method is preselected by default.
    pub checked: bool,
}

impl PaymentMethodView {
    fn derive(index: usize, method: &PaymentMethod) -> Self {
        Self {
            id: method.id,
            holder: method.card_holder.clone(),
            last_four: method.last_four(),
            expiry: method.expiry(),
            brand: method.brand().to_string(),
            checked: index == 0,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub not_authenticated: bool,
    pub no_payment_method: bool,
    pub can_checkout: bool,
    pub payment_methods: Vec<PaymentMethodView>,
}

/// Cart items + summary fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart mutation result fragment: re-rendered items plus out-of-band
/// swaps that close the modal and show a notification.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_update.html")]
pub struct CartUpdateTemplate {
    pub cart: CartView,
    pub message: String,
    pub error: bool,
}

/// Cart count badge fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Delete-confirmation modal fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/delete_modal.html")]
pub struct DeleteModalTemplate {
    pub message: String,
}

/// Floating notification fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/notification.html")]
pub struct NotificationTemplate {
    pub message: String,
    pub error: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Remove-confirmation form data.
#[derive(Debug, Deserialize)]
pub struct RemoveConfirmForm {
    pub index: usize,
}

/// Display the cart page.
///
/// Eligibility is recomputed on every render by probing the
/// payment-methods endpoint; the probe result picks which checkout panel
/// the page shows.
#[instrument(skip(state, auth))]
pub async fn show(State(state): State<AppState>, auth: AuthToken) -> impl IntoResponse {
    let shop = state.shop();
    let cart_items = shop.load_cart_or_empty(auth.as_deref()).await;
    let eligibility = Eligibility::from_probe(shop.list_payment_methods(auth.as_deref()).await);

    let cart = CartView::build(&cart_items, Some(&state.config().media_url));
    let can_checkout = eligibility.can_checkout();
    let (not_authenticated, no_payment_method, payment_methods) = match eligibility {
        Eligibility::Eligible(methods) => (
            false,
            false,
            methods
                .iter()
                .enumerate()
                .map(|(index, method)| PaymentMethodView::derive(index, method))
                .collect(),
        ),
        Eligibility::NoPaymentMethod => (false, true, Vec::new()),
        Eligibility::NotAuthenticated => (true, false, Vec::new()),
    };

    CartShowTemplate {
        cart,
        not_authenticated,
        no_payment_method,
        can_checkout,
        payment_methods,
    }
}

/// Cart count badge (HTMX).
///
/// The header badge re-fetches this whenever a `cart-updated` trigger
/// fires.
#[instrument(skip(state, auth))]
pub async fn count(State(state): State<AppState>, auth: AuthToken) -> impl IntoResponse {
    let count = state.shop().load_cart_or_empty(auth.as_deref()).await.len();
    CartCountTemplate { count }
}

/// Open the delete-confirmation modal (HTMX).
///
/// Captures the pending deletion in the session (overwriting any previous
/// one) and renders the modal with the item's name resolved now.
#[instrument(skip(state, session, auth))]
pub async fn remove_confirm(
    State(state): State<AppState>,
    session: Session,
    auth: AuthToken,
    Form(form): Form<RemoveConfirmForm>,
) -> Result<Response> {
    let cart_items = state.shop().load_cart_or_empty(auth.as_deref()).await;
    let mut cart_state = CartState::new(cart_items, None);

    match cart_state.request_deletion(form.index) {
        Some((item, record)) => {
            let message = format!(
                "¿Estás seguro de que deseas eliminar \"{}\" del carrito?",
                item.name
            );
            session
                .insert(session_keys::PENDING_DELETION, &record)
                .await?;
            Ok(DeleteModalTemplate { message }.into_response())
        }
        None => Ok(NotificationTemplate {
            message: "El producto ya no está en el carrito".to_string(),
            error: true,
        }
        .into_response()),
    }
}

/// Close the modal without deleting (Cancel button or backdrop click).
#[instrument(skip(session))]
pub async fn remove_cancel(session: Session) -> Result<Response> {
    session
        .remove::<PendingDeletion>(session_keys::PENDING_DELETION)
        .await?;
    // Swapping empty content into the modal container closes it
    Ok(axum::response::Html(String::new()).into_response())
}

/// Confirm the pending deletion (HTMX).
///
/// The pending record is consumed atomically from the session and
/// re-validated against a freshly loaded cart before the DELETE goes out;
/// the modal closes on every path.
#[instrument(skip(state, session, auth))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    auth: AuthToken,
) -> Result<Response> {
    let shop = state.shop();
    let pending: Option<PendingDeletion> =
        session.remove(session_keys::PENDING_DELETION).await?;
    let cart_items = shop.load_cart_or_empty(auth.as_deref()).await;
    let mut cart_state = CartState::new(cart_items, pending);

    let media_url = state.config().media_url.clone();

    match cart_state.take_validated_deletion() {
        DeletionOutcome::Nothing => Ok(CartUpdateTemplate {
            cart: CartView::build(cart_state.cart(), Some(&media_url)),
            message: "No hay ninguna eliminación pendiente".to_string(),
            error: true,
        }
        .into_response()),
        DeletionOutcome::Stale => Ok(CartUpdateTemplate {
            cart: CartView::build(cart_state.cart(), Some(&media_url)),
            message: "El carrito ha cambiado, vuelve a intentarlo".to_string(),
            error: true,
        }
        .into_response()),
        DeletionOutcome::Validated(record) => {
            let name = cart_state
                .cart()
                .get(record.index)
                .map(|item| item.name.clone())
                .unwrap_or_default();

            match shop
                .remove_cart_item(auth.as_deref(), record.product_id, record.kind)
                .await
            {
                Ok(()) => {
                    // Full reload from the server; never patch locally
                    let reloaded = shop.load_cart_or_empty(auth.as_deref()).await;
                    state.events().publish_updated();

                    Ok((
                        AppendHeaders([("HX-Trigger", events::CART_UPDATED)]),
                        CartUpdateTemplate {
                            cart: CartView::build(&reloaded, Some(&media_url)),
                            message: format!("{name} eliminado del carrito"),
                            error: false,
                        },
                    )
                        .into_response())
                }
                Err(e) => {
                    tracing::error!(error = %e, "failed to remove cart item");
                    Ok(CartUpdateTemplate {
                        cart: CartView::build(cart_state.cart(), Some(&media_url)),
                        message: "Error al eliminar el producto".to_string(),
                        error: true,
                    }
                    .into_response())
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(name: &str, price: &str, kind: Option<ProductKind>, id: i64) -> CartItem {
        CartItem {
            name: name.to_string(),
            price: price.parse().unwrap(),
            song_id: (kind == Some(ProductKind::Song)).then_some(id),
            album_id: (kind == Some(ProductKind::Album)).then_some(id),
            merch_id: (kind == Some(ProductKind::Merch)).then_some(id),
            cover: None,
        }
    }

    fn media_url() -> Url {
        "http://localhost:8081".parse().unwrap()
    }

    #[test]
    fn test_render_is_idempotent() {
        let cart_items = vec![
            item("Song A", "5.00", Some(ProductKind::Song), 1),
            item("Album B", "20.00", Some(ProductKind::Album), 2),
        ];
        let url = media_url();

        let first = CartView::build(&cart_items, Some(&url));
        let second = CartView::build(&cart_items, Some(&url));
        assert_eq!(first, second);

        let rendered_first = CartItemsTemplate { cart: first }.render().unwrap();
        let rendered_second = CartItemsTemplate { cart: second }.render().unwrap();
        assert_eq!(rendered_first, rendered_second);
    }

    #[test]
    fn test_view_derives_labels_prices_and_codes() {
        let cart_items = vec![
            item("Song A", "5.00", Some(ProductKind::Song), 1),
            item("Album B", "20.00", Some(ProductKind::Album), 2),
            item("Tote", "12.50", Some(ProductKind::Merch), 3),
        ];
        let view = CartView::build(&cart_items, Some(&media_url()));

        assert_eq!(view.items[0].kind_label, "Canción");
        assert_eq!(view.items[1].kind_label, "Álbum");
        assert_eq!(view.items[2].kind_label, "Merchandising");
        assert_eq!(view.items[0].price, "€5.00");
        assert_eq!(view.items[0].type_code, 0);
        assert_eq!(view.items[1].type_code, 1);
        assert_eq!(view.items[2].type_code, 2);
        assert_eq!(view.subtotal, "€37.50");
        assert_eq!(view.tax, "€7.88");
        assert_eq!(view.total, "€45.38");
    }

    #[test]
    fn test_image_falls_back_per_kind() {
        let song = item("S", "1.00", Some(ProductKind::Song), 1);
        let album = item("A", "1.00", Some(ProductKind::Album), 2);
        let merch = item("M", "1.00", Some(ProductKind::Merch), 3);
        let url = media_url();

        assert_eq!(
            image_url(&song, Some(&url)),
            "/static/img/utils/default-song.svg"
        );
        assert_eq!(
            image_url(&album, Some(&url)),
            "/static/img/utils/default-album.svg"
        );
        assert_eq!(
            image_url(&merch, Some(&url)),
            "/static/img/utils/default-merch.svg"
        );
    }

    #[test]
    fn test_cover_resolves_against_media_service() {
        let mut song = item("S", "1.00", Some(ProductKind::Song), 1);
        song.cover = Some("/covers/7.png".to_string());
        assert_eq!(
            image_url(&song, Some(&media_url())),
            "http://localhost:8081/static/covers/7.png"
        );

        song.cover = Some(String::new());
        assert_eq!(
            image_url(&song, Some(&media_url())),
            "/static/img/utils/default-song.svg"
        );
    }

    #[test]
    fn test_untagged_item_is_not_removable() {
        let view = CartView::build(&[item("?", "1.00", None, 0)], Some(&media_url()));
        assert!(!view.items[0].removable);
        assert_eq!(view.items[0].kind_label, "Producto");
        assert_eq!(
            view.items[0].image_url,
            "/static/img/utils/default-song.svg"
        );
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::empty();
        assert!(view.is_empty());
        assert_eq!(view.subtotal, "€0.00");
        assert_eq!(view.total, "€0.00");
    }

    #[test]
    fn test_payment_method_view_preselects_first() {
        let methods = vec![
            PaymentMethod {
                id: 1,
                card_holder: "Ana".to_string(),
                card_number: "4111111111111111".to_string(),
                expire_month: 3,
                expire_year: 2027,
            },
            PaymentMethod {
                id: 2,
                card_holder: "Luis".to_string(),
                card_number: "5500000000000004".to_string(),
                expire_month: 11,
                expire_year: 2028,
            },
        ];

        let views: Vec<_> = methods
            .iter()
            .enumerate()
            .map(|(i, m)| PaymentMethodView::derive(i, m))
            .collect();

        assert!(views[0].checked);
        assert!(!views[1].checked);
        assert_eq!(views[0].brand, "Visa");
        assert_eq!(views[0].last_four, "1111");
        assert_eq!(views[1].expiry, "11/28");
    }
}
