//! Integration tests for store CRUD and stock transfer.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (inv-cli migrate)
//! - The API server running (cargo run -p inventory-api)
//!
//! Run with: cargo test -p inventory-integration-tests -- --ignored

use inventory_integration_tests::{TestContext, envelope, envelope_data, id_of, unique};
use reqwest::{Method, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

// ============================================================================
// Create / Read / Update / Delete
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_create_store_starts_empty() {
    let ctx = TestContext::new();

    let store = ctx.create_store(&unique("My Store"), "New York").await;
    assert_eq!(store["location"], "New York");
    assert_eq!(store["productsQuantity"], 0);
    assert!(store["createdAt"].is_string());

    ctx.cleanup_store(&id_of(&store)).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_get_store_sums_stock_quantities() {
    let ctx = TestContext::new();
    let store = ctx.create_store(&unique("Summed"), "Paris").await;
    let store_id = id_of(&store);

    let shirt = ctx
        .add_stock(&store_id, &unique("Shirt"), "Clothing", 1500, 4)
        .await;
    let lamp = ctx.add_stock(&store_id, &unique("Lamp"), "Home", 2500, 6).await;

    let fetched = envelope_data(ctx.get(&format!("/stores/{store_id}")).await).await;
    assert_eq!(fetched["productsQuantity"], 10);

    ctx.cleanup_store(&store_id).await;
    ctx.cleanup_product(&id_of(&shirt["product"])).await;
    ctx.cleanup_product(&id_of(&lamp["product"])).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_store_replaces_fields() {
    let ctx = TestContext::new();
    let store = ctx.create_store(&unique("Before"), "Rome").await;
    let store_id = id_of(&store);

    let new_name = unique("After");
    let resp = ctx
        .send_json(
            Method::PUT,
            &format!("/stores/{store_id}"),
            &json!({"name": new_name, "location": "Milan"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = envelope_data(resp).await;
    assert_eq!(updated["name"], new_name.as_str());
    assert_eq!(updated["location"], "Milan");
    assert_eq!(updated["id"], store["id"]);

    ctx.cleanup_store(&store_id).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_update_missing_store_is_not_found() {
    let ctx = TestContext::new();
    let resp = ctx
        .send_json(
            Method::PUT,
            &format!("/stores/{}", Uuid::new_v4()),
            &json!({"name": "Ghost", "location": "Nowhere"}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_store_then_get_is_not_found() {
    let ctx = TestContext::new();
    let store = ctx.create_store(&unique("Doomed"), "Oslo").await;
    let store_id = id_of(&store);

    let resp = ctx.delete(&format!("/stores/{store_id}")).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx.get(&format!("/stores/{store_id}")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_delete_nonexistent_store_is_not_found() {
    let ctx = TestContext::new();

    let resp = ctx.delete(&format!("/stores/{}", Uuid::new_v4())).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = envelope(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Store not found");
}

// ============================================================================
// List & Pagination Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_store_list_pagination_respects_limit_and_total() {
    let ctx = TestContext::new();
    let prefix = unique("Paged");
    let mut ids = Vec::new();
    for i in 0..3 {
        let store = ctx.create_store(&format!("{prefix} {i}"), "Lisbon").await;
        ids.push(id_of(&store));
    }

    for (page, expected) in [(1, 2), (2, 1), (3, 0)] {
        let data = envelope_data(
            ctx.get(&format!("/stores?name={prefix}&limit=2&page={page}"))
                .await,
        )
        .await;
        assert_eq!(data["total"], 3);
        assert_eq!(data["page"], page);
        assert_eq!(data["pageSize"], 2);
        assert_eq!(data["results"].as_array().map(Vec::len), Some(expected));
    }

    for id in ids {
        ctx.cleanup_store(&id).await;
    }
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_store_list_filters_location_case_insensitively() {
    let ctx = TestContext::new();
    let location = unique("Reykjavik");
    let store = ctx.create_store(&unique("North"), &location).await;

    let data = envelope_data(
        ctx.get(&format!("/stores?location={}", location.to_uppercase()))
            .await,
    )
    .await;
    assert_eq!(data["total"], 1);
    assert_eq!(data["results"][0]["id"], store["id"]);

    ctx.cleanup_store(&id_of(&store)).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_store_list_orders_by_name() {
    let ctx = TestContext::new();
    let prefix = unique("Sorted");
    let b = ctx.create_store(&format!("{prefix} b"), "Madrid").await;
    let a = ctx.create_store(&format!("{prefix} a"), "Madrid").await;

    let data = envelope_data(
        ctx.get(&format!("/stores?name={prefix}&orderBy=name&orderDir=asc"))
            .await,
    )
    .await;
    let names: Vec<&str> = data["results"]
        .as_array()
        .map(|r| r.iter().filter_map(|s| s["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec![format!("{prefix} a"), format!("{prefix} b")]);

    ctx.cleanup_store(&id_of(&a)).await;
    ctx.cleanup_store(&id_of(&b)).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_store_list_rejects_oversized_limit() {
    let ctx = TestContext::new();
    let resp = ctx.get("/stores?limit=1000").await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = envelope(resp).await;
    assert_eq!(body["error"], "Validation failed");
}

// ============================================================================
// Transfer Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_transfer_from_nonexistent_store_is_not_found() {
    let ctx = TestContext::new();
    let destination = ctx.create_store(&unique("Dest"), "Vienna").await;

    let resp = ctx
        .send_json(
            Method::POST,
            &format!("/stores/{}/transfer", Uuid::new_v4()),
            &json!({"destinationStoreId": destination["id"]}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    ctx.cleanup_store(&id_of(&destination)).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_transfer_to_nonexistent_store_is_not_found() {
    let ctx = TestContext::new();
    let source = ctx.create_store(&unique("Source"), "Vienna").await;

    let resp = ctx
        .send_json(
            Method::POST,
            &format!("/stores/{}/transfer", id_of(&source)),
            &json!({"destinationStoreId": Uuid::new_v4().to_string()}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    ctx.cleanup_store(&id_of(&source)).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_transfer_moves_and_merges_stock() {
    let ctx = TestContext::new();
    let source = ctx.create_store(&unique("From"), "Prague").await;
    let destination = ctx.create_store(&unique("To"), "Brno").await;
    let (source_id, destination_id) = (id_of(&source), id_of(&destination));

    let shared = unique("Shared");
    let only_source = unique("Solo");
    let a = ctx.add_stock(&source_id, &shared, "Food", 100, 3).await;
    let b = ctx.add_stock(&source_id, &only_source, "Toys", 900, 2).await;
    ctx.add_stock(&destination_id, &shared, "Food", 150, 4).await;

    let resp = ctx
        .send_json(
            Method::POST,
            &format!("/stores/{source_id}/transfer"),
            &json!({"destinationStoreId": destination_id}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = envelope(resp).await;
    assert_eq!(body["success"], true);
    assert!(body["data"].is_null());

    let source_stock =
        envelope_data(ctx.get(&format!("/stores/{source_id}/products")).await).await;
    assert_eq!(source_stock["total"], 0);

    let destination_stock = envelope_data(
        ctx.get(&format!("/stores/{destination_id}/products?limit=100"))
            .await,
    )
    .await;
    assert_eq!(destination_stock["total"], 2);

    let rows = destination_stock["results"].as_array().cloned().unwrap_or_default();
    let find = |name: &str| -> Value {
        rows.iter()
            .find(|row| row["product"]["name"] == name)
            .cloned()
            .unwrap_or(Value::Null)
    };
    // Merged row keeps the destination price and adds quantities
    assert_eq!(find(&shared)["quantity"], 7);
    assert_eq!(find(&shared)["price"], 150);
    assert_eq!(find(&only_source)["quantity"], 2);
    assert_eq!(find(&only_source)["storeId"], destination_id.as_str());

    let totals = envelope_data(ctx.get(&format!("/stores/{destination_id}")).await).await;
    assert_eq!(totals["productsQuantity"], 9);

    ctx.cleanup_store(&source_id).await;
    ctx.cleanup_store(&destination_id).await;
    ctx.cleanup_product(&id_of(&a["product"])).await;
    ctx.cleanup_product(&id_of(&b["product"])).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_transfer_to_self_keeps_stock() {
    let ctx = TestContext::new();
    let store = ctx.create_store(&unique("Self"), "Bern").await;
    let store_id = id_of(&store);
    let stock = ctx.add_stock(&store_id, &unique("Clock"), "Home", 700, 1).await;

    let resp = ctx
        .send_json(
            Method::POST,
            &format!("/stores/{store_id}/transfer"),
            &json!({"destinationStoreId": store_id}),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let data = envelope_data(ctx.get(&format!("/stores/{store_id}/products")).await).await;
    assert_eq!(data["total"], 1);

    ctx.cleanup_store(&store_id).await;
    ctx.cleanup_product(&id_of(&stock["product"])).await;
}
