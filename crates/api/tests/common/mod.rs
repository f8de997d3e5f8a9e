//! Shared helpers for HTTP-level integration tests.
//!
//! Tests drive the real router (same middleware stack as `main.rs`) with
//! `tower::ServiceExt::oneshot`, backed by [`InMemoryStore`] instead of
//! PostgreSQL.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use salesorder_api::config::ServerConfig;
use salesorder_api::router::build_app_router;
use salesorder_api::state::AppState;
use salesorder_core::pagination::PageRequest;
use salesorder_core::sales_order::SearchFilter;
use salesorder_db::models::sales_order::{ItemOrder, OrderPage, SalesOrder, SalesOrderInput};
use salesorder_db::repositories::SalesOrderStore;

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// [`SalesOrderStore`] held in a `HashMap`, with call counting and optional
/// artificial latency or failure.
#[derive(Default)]
pub struct InMemoryStore {
    orders: Mutex<HashMap<String, SalesOrder>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
    fail: bool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay: Some(delay),
            ..Self::default()
        })
    }

    /// Every call fails with a pool timeout.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    async fn enter(&self) -> Result<(), sqlx::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(())
    }

    fn build(id_order: String, input: &SalesOrderInput) -> SalesOrder {
        let items = input
            .items
            .iter()
            .map(|item| ItemOrder {
                id_item: uuid::Uuid::new_v4().to_string(),
                id_order: id_order.clone(),
                item_name: item.item_name.clone(),
                qty: item.qty,
                price: item.price,
                total: item.total,
            })
            .collect();

        SalesOrder {
            id_order,
            number_order: input.number_order.clone(),
            date: input.date,
            customer: input.customer.clone(),
            address: input.address.clone(),
            items,
        }
    }

    fn matching(&self, filter: &SearchFilter) -> Vec<SalesOrder> {
        let orders = self.orders.lock().unwrap();
        let mut matched: Vec<SalesOrder> = orders
            .values()
            .filter(|o| matches_filter(filter, o))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id_order.cmp(&b.id_order)));
        matched
    }

    fn page_of(&self, filter: &SearchFilter, page: PageRequest) -> OrderPage {
        let matched = self.matching(filter);
        let count = matched.len() as i64;
        let orders = matched
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        OrderPage { count, orders }
    }
}

#[async_trait]
impl SalesOrderStore for InMemoryStore {
    async fn health_check(&self) -> Result<(), sqlx::Error> {
        self.enter().await
    }

    async fn create(&self, input: &SalesOrderInput) -> Result<SalesOrder, sqlx::Error> {
        self.enter().await?;
        let order = Self::build(uuid::Uuid::new_v4().to_string(), input);
        self.orders
            .lock()
            .unwrap()
            .insert(order.id_order.clone(), order.clone());
        Ok(order)
    }

    async fn list(&self, page: PageRequest) -> Result<OrderPage, sqlx::Error> {
        self.enter().await?;
        Ok(self.page_of(&SearchFilter::default(), page))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<SalesOrder>, sqlx::Error> {
        self.enter().await?;
        Ok(self.orders.lock().unwrap().get(id).cloned())
    }

    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<OrderPage, sqlx::Error> {
        self.enter().await?;
        Ok(self.page_of(filter, page))
    }

    async fn search_count(&self, filter: &SearchFilter) -> Result<i64, sqlx::Error> {
        self.enter().await?;
        Ok(self.matching(filter).len() as i64)
    }

    async fn update(
        &self,
        id: &str,
        input: &SalesOrderInput,
    ) -> Result<Option<SalesOrder>, sqlx::Error> {
        self.enter().await?;
        let mut orders = self.orders.lock().unwrap();
        if !orders.contains_key(id) {
            return Ok(None);
        }
        let order = Self::build(id.to_string(), input);
        orders.insert(id.to_string(), order.clone());
        Ok(Some(order))
    }

    async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        self.enter().await?;
        Ok(self.orders.lock().unwrap().remove(id).is_some())
    }
}

/// Mirrors the repository's SQL predicate: case-sensitive substring on order
/// number or customer, AND the UTC calendar day of `date`.
fn matches_filter(filter: &SearchFilter, order: &SalesOrder) -> bool {
    let keyword_ok = filter
        .keywords
        .as_deref()
        .is_none_or(|k| order.number_order.contains(k) || order.customer.contains(k));
    let date_ok = filter.date.is_none_or(|d| d == order.date.date_naive());
    keyword_ok && date_ok
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        store_timeout: Duration::from_secs(5),
        db_max_connections: 1,
    }
}

/// Build the full application router over `store` with the default test config.
pub fn build_test_app(store: Arc<InMemoryStore>) -> Router {
    build_test_app_with_config(store, test_config())
}

pub fn build_test_app_with_config(store: Arc<InMemoryStore>, config: ServerConfig) -> Router {
    let state = AppState {
        store,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn send_json(app: Router, method: Method, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PUT, uri, body).await
}

/// Collect a response body and parse it as JSON (`Null` for an empty body).
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}
