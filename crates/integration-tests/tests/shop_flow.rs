//! Browsing, cart, and chat checkout through the full router.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;

use mousse_melts_integration_tests::{TestContext, WHATSAPP_NUMBER};

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_home_lists_fallback_products() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Oreo Cupcake"));
    assert!(response.body.contains("Red Velvet Cupcake"));
    assert!(response.body.contains("Rs. 200"));
    assert!(response.body.contains("Order Now"));
}

#[tokio::test]
async fn test_home_shows_placeholder_until_catalog_loads() {
    let ctx = TestContext::loading().unwrap();
    let mut client = ctx.client();

    let response = client.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Baking fresh data..."));
    assert!(!response.body.contains("Order Now"));

    ctx.catalog.spawn_initialize().await.unwrap();

    let response = client.get("/").await;
    assert!(!response.body.contains("Baking fresh data..."));
    assert!(response.body.contains("Oreo Cupcake"));
}

#[tokio::test]
async fn test_category_filter() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    let response = client.get("/?category=Sundaes").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.body.contains("Oreo Cupcake"));
    assert!(response.body.contains("Nothing in this category yet"));
}

#[tokio::test]
async fn test_our_story_renders_chapters() {
    let ctx = TestContext::new().await.unwrap();
    let response = ctx.client().get("/our-story").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("The Beginning"));
    assert!(response.body.contains("Just The Beginning"));
}

#[tokio::test]
async fn test_unknown_page_renders_home() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    let response = client.get("/does-not-exist").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Oreo Cupcake"));

    let response = client.post_form("/does-not-exist", &[]).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_and_security_headers() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    let response = client.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = client.get("/health/ready").await;
    assert_eq!(response.status, StatusCode::OK);

    ctx.store.set_fail_reads(true);
    let response = client.get("/health/ready").await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);

    let response = client.get("/").await;
    assert_eq!(
        response
            .headers
            .get("x-frame-options")
            .and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
    assert!(response.headers.contains_key("content-security-policy"));
    assert!(response.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_first_visit_is_counted_once() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    client.get("/").await;
    client.get("/our-story").await;
    client.get("/cart").await;

    assert!(ctx.wait_for_stats(|stats| stats.total_visits == 1).await);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let stats = ctx.catalog.repository().fetch_stats().await.unwrap();
    assert_eq!(stats.total_visits, 1);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_add_update_remove() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    let response = client
        .post_form("/cart/add", &[("product_id", "c1"), ("return_to", "/cart")])
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/cart"));

    client
        .post_form("/cart/add", &[("product_id", "c1"), ("return_to", "/cart")])
        .await;
    let response = client.get("/cart").await;
    assert!(response.body.contains("Your Cart"));
    assert!(response.body.contains("Rs. 400"));

    let response = client
        .post_form(
            "/cart/update",
            &[("product_id", "c1"), ("delta", "-1"), ("return_to", "/cart")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let response = client.get("/cart").await;
    assert!(response.body.contains("1 item"));

    // Quantity never drops below one.
    client
        .post_form(
            "/cart/update",
            &[("product_id", "c1"), ("delta", "-1"), ("return_to", "/cart")],
        )
        .await;
    let response = client.get("/cart").await;
    assert!(response.body.contains("1 item"));

    client
        .post_form("/cart/remove", &[("product_id", "c1"), ("return_to", "/cart")])
        .await;
    let response = client.get("/cart").await;
    assert!(response.body.contains("Your Cart is Empty"));
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let ctx = TestContext::new().await.unwrap();
    let response = ctx
        .client()
        .post_form("/cart/add", &[("product_id", "nope")])
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_external_return_to_goes_home() {
    let ctx = TestContext::new().await.unwrap();
    let response = ctx
        .client()
        .post_form(
            "/cart/add",
            &[("product_id", "c2"), ("return_to", "https://evil.example/")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_notification_and_drawer() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    client
        .post_form("/cart/add", &[("product_id", "c2"), ("return_to", "/")])
        .await;
    let response = client.get("/").await;
    assert!(response.body.contains("Added to bag"));
    assert!(!response.body.contains("Your Bag"));

    client
        .post_form("/cart/toggle", &[("open", "true"), ("return_to", "/")])
        .await;
    client
        .post_form("/cart/notification/dismiss", &[("return_to", "/")])
        .await;
    let response = client.get("/").await;
    assert!(response.body.contains("Your Bag"));
    assert!(!response.body.contains("Added to bag"));

    // Without `open` the drawer flips.
    client.post_form("/cart/toggle", &[("return_to", "/")]).await;
    let response = client.get("/").await;
    assert!(!response.body.contains("Your Bag"));
}

#[tokio::test]
async fn test_hero_action_adds_linked_product() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    let response = client.post_form("/hero/action", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let response = client.get("/cart").await;
    assert!(response.body.contains("Red Velvet Cupcake"));
}

// =============================================================================
// Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_routes_home_and_hands_off_chat() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    client
        .post_form("/cart/add", &[("product_id", "c1"), ("return_to", "/")])
        .await;
    let response = client
        .post_form(
            "/checkout",
            &[("name", "Ayesha"), ("address", "House 5, Johar Town")],
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let home = client.get("/").await;
    assert_eq!(home.status, StatusCode::OK);
    let link = home.chat_link().unwrap();
    assert!(link.starts_with(&format!("https://wa.me/{WHATSAPP_NUMBER}?text=")));
    assert!(home.body.contains("target=\"_blank\""));

    let message = home.order_message().unwrap();
    assert!(message.contains("Ayesha"));
    assert!(message.contains("House 5, Johar Town"));
    assert!(message.contains("1x Oreo Cupcake (Rs. 200)"));

    // The handoff happens once.
    let again = client.get("/").await;
    assert!(again.chat_link().is_none());

    let response = client.get("/checkout").await;
    assert!(response.body.contains("No Items to Checkout"));

    assert!(ctx.wait_for_stats(|stats| stats.leads_generated == 1).await);
}

#[tokio::test]
async fn test_checkout_with_empty_cart_goes_to_cart() {
    let ctx = TestContext::new().await.unwrap();
    let response = ctx
        .client()
        .post_form("/checkout", &[("name", "Ayesha"), ("address", "Lahore")])
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/cart"));
}

#[tokio::test]
async fn test_checkout_requires_name_and_address() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    client
        .post_form("/cart/add", &[("product_id", "c1"), ("return_to", "/")])
        .await;
    let response = client
        .post_form("/checkout", &[("name", "Ayesha"), ("address", "   ")])
        .await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Please fill in your name and address"));
    assert!(response.body.contains("value=\"Ayesha\""));

    // Cart is untouched.
    let response = client.get("/cart").await;
    assert!(response.body.contains("Oreo Cupcake"));
}
