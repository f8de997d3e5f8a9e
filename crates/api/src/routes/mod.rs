pub mod health;
pub mod sales_order;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /salesorder                  list, create
/// /salesorder/search           keyword/date search
/// /salesorder/{id}             get, replace, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/salesorder", sales_order::router())
}
