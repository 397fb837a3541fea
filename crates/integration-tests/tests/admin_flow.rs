//! Admin login gating, draft editing, and saving.

#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use serde_json::json;

use mousse_melts_integration_tests::{ADMIN_USERNAME, TestClient, TestContext};

async fn signed_in(ctx: &TestContext) -> TestClient {
    let mut client = ctx.client();
    let response = client.login().await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin"));
    client
}

// =============================================================================
// Gating
// =============================================================================

#[tokio::test]
async fn test_admin_requires_login() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    let response = client.get("/admin").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));

    let response = client.get("/api/admin/draft").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = client.json(Method::POST, "/api/admin/save", None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = ctx.client();

    let response = client
        .post_form(
            "/login",
            &[("username", ADMIN_USERNAME), ("password", "not-the-password")],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.contains("Invalid username or password"));
    assert!(response.body.contains(&format!("value=\"{ADMIN_USERNAME}\"")));

    let response = client.get("/admin").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_login_and_logout() {
    let ctx = TestContext::new().await.unwrap();
    let mut client = signed_in(&ctx).await;

    let response = client.get("/admin").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Product Inventory"));
    assert!(response.body.contains("Oreo Cupcake"));
    // Admin pages show none of the shop chrome.
    assert!(!response.body.contains("site-header"));
    assert!(!response.body.contains("site-footer"));

    // Already signed in: the login page forwards to the dashboard.
    let response = client.get("/login").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/admin"));

    let response = client.post_form("/logout", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));

    let response = client.get("/admin").await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));
}

// =============================================================================
// Draft editing
// =============================================================================

#[tokio::test]
async fn test_edits_stay_in_draft_until_saved() {
    let ctx = TestContext::new().await.unwrap();
    let mut admin = signed_in(&ctx).await;
    let mut shopper = ctx.client();

    let response = admin
        .json(
            Method::PATCH,
            "/api/admin/products/c1",
            Some(json!({ "name": "Oreo Dream", "salePrice": null })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["name"], "Oreo Dream");

    let response = admin.get("/api/admin/draft").await;
    assert_eq!(response.json()["products"][0]["name"], "Oreo Dream");
    assert_eq!(response.json()["showSaved"], false);

    // Shoppers still see the saved catalog.
    let page = shopper.get("/").await;
    assert!(page.body.contains("Oreo Cupcake"));
    assert!(!page.body.contains("Oreo Dream"));

    let response = admin.json(Method::POST, "/api/admin/save", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["savedAt"].is_string());

    let page = shopper.get("/").await;
    assert!(page.body.contains("Oreo Dream"));

    let stored = ctx.catalog.repository().fetch_products().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().any(|p| p.name == "Oreo Dream" && p.sale_price.is_none()));

    let response = admin.get("/api/admin/draft").await;
    assert_eq!(response.json()["showSaved"], true);
}

#[tokio::test]
async fn test_product_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let mut admin = signed_in(&ctx).await;

    let response = admin.json(Method::POST, "/api/admin/products", None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.json()["id"].as_str().unwrap().to_string();

    let response = admin.get("/api/admin/draft").await;
    assert_eq!(response.json()["products"].as_array().unwrap().len(), 3);

    // Move the new product to the top.
    let response = admin
        .json(
            Method::POST,
            "/api/admin/products/reorder",
            Some(json!({ "from": 2, "to": 0 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()[0]["id"], id.as_str());
    assert_eq!(response.json()[0]["displayOrder"], 0);
    assert_eq!(response.json()[2]["displayOrder"], 2);

    let response = admin
        .json(
            Method::POST,
            "/api/admin/products/reorder",
            Some(json!({ "from": 0, "to": 9 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Deleting needs confirmation.
    let uri = format!("/api/admin/products/{id}");
    let response = admin.json(Method::DELETE, &uri, None).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = admin
        .json(Method::DELETE, &format!("{uri}?confirm=true"), None)
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = admin.json(Method::DELETE, &format!("{uri}?confirm=true"), None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_settings_and_coupons_round_trip_to_shop() {
    let ctx = TestContext::new().await.unwrap();
    let mut admin = signed_in(&ctx).await;

    let response = admin
        .json(
            Method::PATCH,
            "/api/admin/settings/announcement",
            Some(json!({ "text": "Closed on Eid", "isMarquee": false })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = admin
        .json(
            Method::PATCH,
            "/api/admin/settings/hero",
            Some(json!({ "title": "Fresh, Daily.", "linkedProductId": null })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["linkedProductId"].is_null());

    let response = admin.json(Method::POST, "/api/admin/coupons", None).await;
    assert_eq!(response.status, StatusCode::CREATED);
    let coupon_id = response.json()["id"].as_str().unwrap().to_string();

    let response = admin
        .json(
            Method::PATCH,
            &format!("/api/admin/coupons/{coupon_id}"),
            Some(json!({ "code": "EID25", "discountPercent": 25 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = admin.json(Method::POST, "/api/admin/save", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let mut shopper = ctx.client();
    let page = shopper.get("/").await;
    assert!(page.body.contains("Closed on Eid"));
    assert!(page.body.contains("Fresh"));

    // Without a linked product the hero button jumps to the menu.
    let response = shopper.post_form("/hero/action", &[]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/#menu"));

    shopper
        .post_form("/cart/add", &[("product_id", "c2"), ("return_to", "/checkout")])
        .await;

    let response = shopper.post_form("/checkout/coupon", &[("code", "eid25")]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let page = shopper.get("/checkout").await;
    assert!(page.body.contains("25% off"));
}

#[tokio::test]
async fn test_save_failure_keeps_draft() {
    let ctx = TestContext::new().await.unwrap();
    let mut admin = signed_in(&ctx).await;

    admin
        .json(
            Method::PATCH,
            "/api/admin/products/c2",
            Some(json!({ "price": 275 })),
        )
        .await;

    ctx.store.set_fail_writes(true);
    let response = admin.json(Method::POST, "/api/admin/save", None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body, "Error saving data.");

    let response = admin.get("/api/admin/draft").await;
    assert_eq!(response.json()["products"][1]["price"], 275.0);
    assert_eq!(response.json()["showSaved"], false);

    ctx.store.set_fail_writes(false);
    let response = admin.json(Method::POST, "/api/admin/save", None).await;
    assert_eq!(response.status, StatusCode::OK);
}
