//! Integration tests for the inventory API.
//!
//! The tests talk HTTP to a running server backed by a migrated database and
//! are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the API
//! cargo run -p inventory-cli -- migrate
//! cargo run -p inventory-api
//!
//! # Run integration tests (API_BASE_URL defaults to http://localhost:4002)
//! cargo test -p inventory-integration-tests -- --ignored
//! ```
//!
//! Every test creates its own stores with unique names and deletes them at
//! the end, so tests can share a database.

use reqwest::{Client, Response, StatusCode};
use serde_json::{Value, json};

/// Base URL of the API under test (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:4002".to_string())
}

/// A short unique suffix so concurrent tests never collide on names.
#[must_use]
pub fn unique(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", id.get(..12).unwrap_or(&id))
}

/// HTTP client bound to the API under test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Create a context from `API_BASE_URL`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: api_base_url(),
        }
    }

    /// Absolute URL of an API path (`path` starts with `/`).
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    /// `GET` an API path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Send a JSON body with the given method.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn send_json(&self, method: reqwest::Method, path: &str, body: &Value) -> Response {
        self.client
            .request(method, self.url(path))
            .json(body)
            .send()
            .await
            .expect("JSON request failed")
    }

    /// `DELETE` an API path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("DELETE request failed")
    }

    /// Create a store and return its JSON representation.
    ///
    /// # Panics
    ///
    /// Panics if the API does not answer 201.
    pub async fn create_store(&self, name: &str, location: &str) -> Value {
        let resp = self
            .send_json(
                reqwest::Method::POST,
                "/stores",
                &json!({"name": name, "location": location}),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        envelope_data(resp).await
    }

    /// Stock a product in a store and return the created stock row.
    ///
    /// # Panics
    ///
    /// Panics if the API does not answer 201.
    pub async fn add_stock(
        &self,
        store_id: &str,
        name: &str,
        category: &str,
        price: i64,
        quantity: i64,
    ) -> Value {
        let resp = self
            .send_json(
                reqwest::Method::POST,
                &format!("/stores/{store_id}/products"),
                &json!({
                    "name": name,
                    "category": category,
                    "price": price,
                    "quantity": quantity,
                }),
            )
            .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        envelope_data(resp).await
    }

    /// Best-effort removal of a store created by a test.
    pub async fn cleanup_store(&self, store_id: &str) {
        let _ = self
            .client
            .delete(self.url(&format!("/stores/{store_id}")))
            .send()
            .await;
    }

    /// Best-effort removal of a product created by a test.
    pub async fn cleanup_product(&self, product_id: &str) {
        let _ = self
            .client
            .delete(self.url(&format!("/products/{product_id}")))
            .send()
            .await;
    }
}

/// Parse a response envelope.
///
/// # Panics
///
/// Panics if the body is not JSON.
pub async fn envelope(resp: Response) -> Value {
    resp.json().await.expect("Response body is not JSON")
}

/// Parse a successful envelope and return its `data`.
///
/// # Panics
///
/// Panics if the body is not JSON or `success` is not `true`.
pub async fn envelope_data(resp: Response) -> Value {
    let body = envelope(resp).await;
    assert_eq!(body["success"], true, "unexpected failure: {body}");
    body["data"].clone()
}

/// The `id` field of a JSON object as a string.
///
/// # Panics
///
/// Panics if there is no string `id`.
#[must_use]
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("missing id").to_string()
}
