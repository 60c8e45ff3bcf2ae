//! The two-step deletion workflow: confirmation modal, session-held
//! pending record, re-validation against a fresh cart and the
//! cart-updated broadcast.

use oversound_integration_tests::{TestContext, album, merch, song};

#[tokio::test]
async fn test_confirm_then_delete_removes_the_item_once() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1), album("Album B", "20.00", 2)]);

    // Step 1: open the confirmation modal
    let body = ctx
        .post_form("/cart/remove/confirm", &[("index", "0")])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("¿Estás seguro de que deseas eliminar &quot;Song A&quot; del carrito?"));

    // Step 2: confirm
    let resp = ctx.post_form("/cart/remove", &[]).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("HX-Trigger").map(|v| v.to_str().unwrap()),
        Some("cart-updated")
    );

    let body = resp.text().await.unwrap();
    assert!(body.contains("Song A eliminado del carrito"));
    // Re-rendered from a full reload: only the album remains
    assert!(body.contains("Album B"));
    assert!(!body.contains("Canción"));

    assert_eq!(*ctx.shop.deletes.lock().unwrap(), vec![(1, 0)]);
}

#[tokio::test]
async fn test_delete_without_confirmation_is_refused() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1)]);

    let resp = ctx.post_form("/cart/remove", &[]).await;
    assert!(resp.headers().get("HX-Trigger").is_none());
    let body = resp.text().await.unwrap();
    assert!(body.contains("No hay ninguna eliminación pendiente"));
    assert!(ctx.shop.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_confirmation_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1), album("Album B", "20.00", 2)]);

    ctx.post_form("/cart/remove/confirm", &[("index", "0")]).await;

    // The cart changes under the open modal (another tab, say)
    ctx.seed_cart(vec![merch("Tote Bag", "12.50", 3), album("Album B", "20.00", 2)]);

    let body = ctx.post_form("/cart/remove", &[]).await.text().await.unwrap();
    assert!(body.contains("El carrito ha cambiado, vuelve a intentarlo"));
    assert!(ctx.shop.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_confirmation_is_consumed_by_the_first_delete() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1)]);

    ctx.post_form("/cart/remove/confirm", &[("index", "0")]).await;

    let first = ctx.post_form("/cart/remove", &[]).await.text().await.unwrap();
    assert!(first.contains("eliminado del carrito"));

    // A double-submitted confirm must not delete twice
    let second = ctx.post_form("/cart/remove", &[]).await.text().await.unwrap();
    assert!(second.contains("No hay ninguna eliminación pendiente"));

    assert_eq!(ctx.shop.deletes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_discards_the_pending_deletion() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1)]);

    ctx.post_form("/cart/remove/confirm", &[("index", "0")]).await;

    let body = ctx
        .post_form("/cart/remove/cancel", &[])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.is_empty());

    let body = ctx.post_form("/cart/remove", &[]).await.text().await.unwrap();
    assert!(body.contains("No hay ninguna eliminación pendiente"));
    assert!(ctx.shop.deletes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_confirming_a_vanished_item_shows_an_error() {
    let ctx = TestContext::new().await;
    ctx.seed_cart(vec![song("Song A", "5.00", 1)]);

    let body = ctx
        .post_form("/cart/remove/confirm", &[("index", "5")])
        .await
        .text()
        .await
        .unwrap();
    assert!(body.contains("El producto ya no está en el carrito"));
}
