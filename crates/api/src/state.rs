use std::sync::Arc;

use salesorder_db::repositories::SalesOrderStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Order store, constructed in `main` and injected here.
    pub store: Arc<dyn SalesOrderStore>,
    /// Server configuration (store deadline, CORS, timeouts).
    pub config: Arc<ServerConfig>,
}
