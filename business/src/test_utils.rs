//! Test utilities for exercising the dashboard against a mock API server.
//!
//! # Example
//!
//! ```ignore
//! let mut test_ctx = TestContext::new().await;
//! test_ctx
//!     .mock_suspicious_domains(vec![sample_suspicious(
//!         1,
//!         "acme-login.com",
//!         "Acme",
//!         "2024-03-01T10:00:00Z",
//!     )])
//!     .await;
//! test_ctx.set_authenticated();
//!
//! test_ctx.dashboard.load(ViewKind::Suspicious).await.expect("load");
//! ```

#![cfg(test)]

use std::sync::Arc;

use flume::Receiver;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

use crate::{BusinessConfig, Dashboard, KeyValueStore, MemoryStore, Notification, TOKEN_KEY};

/// Token used by [`TestContext::set_authenticated`] and the mock matchers.
pub const TEST_TOKEN: &str = "test_token";

/// A mock server plus a dashboard pointed at it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub store: Arc<MemoryStore>,
    pub dashboard: Dashboard,
    pub notifications: Receiver<Notification>,
}

impl TestContext {
    /// Create a signed-out context with a fresh mock server.
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new())).await
    }

    /// Create a context over an existing store, rehydrating whatever it holds.
    pub async fn with_store(store: Arc<MemoryStore>) -> Self {
        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(mock_server.uri());
        let (dashboard, notifications) = Dashboard::with_http(config, store.clone());

        Self {
            mock_server,
            store,
            dashboard,
            notifications,
        }
    }

    /// Store [`TEST_TOKEN`] and rebuild the dashboard so the session picks it up.
    pub fn set_authenticated(&mut self) {
        self.store.set(TOKEN_KEY, TEST_TOKEN).expect("set token");
        let config = self.dashboard.config().clone();
        let (dashboard, notifications) = Dashboard::with_http(config, self.store.clone());
        self.dashboard = dashboard;
        self.notifications = notifications;
    }

    /// Every notification published so far.
    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifications.drain().collect()
    }

    /// Number of requests the mock server has received.
    pub async fn request_count(&self) -> usize {
        self.mock_server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }

    pub async fn mock_login(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_customers(&self, customers: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/v1/customers/view"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": customers })))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_suspicious_domains(&self, rows: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/api/v1/suspicious-domains"))
            .and(header("Authorization", format!("Bearer {TEST_TOKEN}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": rows })))
            .mount(&self.mock_server)
            .await;
    }

    /// Mount a bodiless `status` response for `http_method` on `endpoint`.
    pub async fn mock_status(&self, http_method: &str, endpoint: &str, status: u16) {
        Mock::given(method(http_method))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.mock_server)
            .await;
    }
}

pub fn sample_customer(id: i64, name: &str, domains: &[&str]) -> Value {
    let domains: Vec<Value> = domains
        .iter()
        .zip(0_i64..)
        .map(|(domain, i)| json!({ "id": id * 100 + i, "domain": domain, "customer_id": id }))
        .collect();
    json!({ "id": id, "name": name, "domain_customers": domains })
}

pub fn sample_suspicious(id: i64, domain: &str, customer: &str, found_date: &str) -> Value {
    json!({
        "id": id,
        "suspicious_domain": domain,
        "found_date": found_date,
        "customer": { "id": id * 10, "name": customer },
        "photo_url": format!("shots/{id}.png"),
    })
}
