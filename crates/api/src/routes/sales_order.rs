//! Route definitions for sales orders.
//!
//! Mounted at `/salesorder` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::sales_order;
use crate::state::AppState;

/// Sales order routes.
///
/// ```text
/// GET    /                   -> list_sales_orders (?page, limit)
/// POST   /                   -> create_sales_order
/// GET    /search             -> search_sales_orders (?keywords, date, page, limit)
/// GET    /{id}               -> get_sales_order
/// PUT    /{id}               -> update_sales_order
/// DELETE /{id}               -> delete_sales_order
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(sales_order::list_sales_orders).post(sales_order::create_sales_order),
        )
        .route("/search", get(sales_order::search_sales_orders))
        .route(
            "/{id}",
            get(sales_order::get_sales_order)
                .put(sales_order::update_sales_order)
                .delete(sales_order::delete_sales_order),
        )
}
