//! Checkout flow: shipping modal, purchase submission, wire shape of the
//! purchase body and the guards that keep bad requests off the network.

use oversound_integration_tests::{TestContext, album, merch, song, visa};

const SHIPPING_FIELDS: [(&str, &str); 6] = [
    ("full-name", "Ana García"),
    ("address", "Calle Mayor 1"),
    ("city", "Madrid"),
    ("postal-code", "28001"),
    ("country", "España"),
    ("phone", "600000000"),
];

fn checkout_form(payment_method: &str) -> Vec<(&str, &str)> {
    let mut form = vec![("payment-method", payment_method)];
    form.extend_from_slice(&SHIPPING_FIELDS);
    form
}

#[tokio::test]
async fn test_purchase_partitions_cart_and_carries_vat_inclusive_total() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![
        song("Song A", "5.00", 1),
        album("Album B", "20.00", 2),
        merch("Tote Bag", "12.50", 3),
    ]);
    ctx.seed_payment_methods(vec![visa(4, "Ana García")]);

    let resp = ctx.post_form("/checkout", &checkout_form("4")).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("HX-Trigger").map(|v| v.to_str().unwrap()),
        Some("cart-updated")
    );

    let body = resp.text().await.unwrap();
    assert!(body.contains("¡Compra realizada con éxito!"));
    // Redirect home after the confirmation delay
    assert!(body.contains("setTimeout"));

    let purchases = ctx.shop.purchases.lock().unwrap();
    assert_eq!(purchases.len(), 1);
    let purchase = &purchases[0];

    assert_eq!(purchase["paymentMethodId"], 4);
    // 37.50 + 21% VAT, unrounded on the wire
    assert_eq!(purchase["purchasePrice"], 45.375);
    assert_eq!(purchase["songIds"], serde_json::json!([1]));
    assert_eq!(purchase["albumIds"], serde_json::json!([2]));
    assert_eq!(purchase["merchIds"], serde_json::json!([3]));

    let date = purchase["purchaseDate"].as_str().unwrap();
    assert!(date.contains('T'));
    assert!(date.ends_with('Z'));

    // Shipping stays off the wire unless the extension is enabled
    assert!(purchase.get("shipping").is_none());
}

#[tokio::test]
async fn test_shipping_address_included_when_extension_enabled() {
    let ctx = TestContext::with_shipping(true).await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1)]);
    ctx.seed_payment_methods(vec![visa(4, "Ana García")]);

    ctx.post_form("/checkout", &checkout_form("4")).await;

    let purchases = ctx.shop.purchases.lock().unwrap();
    let shipping = &purchases[0]["shipping"];
    assert_eq!(shipping["fullName"], "Ana García");
    assert_eq!(shipping["postalCode"], "28001");
    assert_eq!(shipping["country"], "España");
}

#[tokio::test]
async fn test_empty_cart_never_reaches_the_purchase_endpoint() {
    let ctx = TestContext::new().await;

    let body = ctx.get("/checkout/shipping").await.text().await.unwrap();
    assert!(body.contains("El carrito está vacío"));

    let body = ctx
        .post_form("/checkout", &checkout_form("4"))
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("El carrito está vacío"));

    assert!(ctx.shop.purchases.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_payment_method_blocks_the_purchase() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1)]);

    let mut form = Vec::new();
    form.extend_from_slice(&SHIPPING_FIELDS);
    let body = ctx.post_form("/checkout", &form).await.text().await.unwrap();

    assert!(body.contains("Por favor selecciona un método de pago"));
    assert!(ctx.shop.purchases.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_purchase_surfaces_the_service_message() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1)]);
    *ctx.shop.purchase_rejection.lock().unwrap() =
        Some((400, serde_json::json!({"message": "Saldo insuficiente"})));

    let resp = ctx.post_form("/checkout", &checkout_form("4")).await;
    assert!(resp.headers().get("HX-Trigger").is_none());

    let body = resp.text().await.unwrap();
    assert!(body.contains("Error: Saldo insuficiente"));
    assert!(!body.contains("¡Compra realizada con éxito!"));
}

#[tokio::test]
async fn test_shipping_modal_carries_the_selected_payment_method() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1)]);

    let body = ctx
        .get("/checkout/shipping?payment-method=4")
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("Datos de envío"));
    assert!(body.contains(r#"name="payment-method" value="4""#));
}
