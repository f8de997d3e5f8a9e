//! Handlers for the sales order endpoints.
//!
//! Each handler validates its input before the store is touched, then awaits
//! exactly one store call under the configured deadline.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use salesorder_core::error::CoreError;
use salesorder_core::pagination::PageRequest;
use salesorder_core::sales_order::{SearchFilter, SALES_ORDER_ENTITY};
use salesorder_db::models::sales_order::SalesOrderInput;

use crate::deadline::with_deadline;
use crate::error::{AppError, AppResult};
use crate::query::{PaginationParams, SearchParams};
use crate::response::{DataResponse, PageResponse};
use crate::state::AppState;

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: SALES_ORDER_ENTITY,
        id: id.to_string(),
    })
}

/// POST /salesorder
///
/// Create an order and its items. Ids are generated server-side.
pub async fn create_sales_order(
    State(state): State<AppState>,
    payload: Result<Json<SalesOrderInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    input.validate()?;

    let order = with_deadline(
        state.config.store_timeout,
        "create_sales_order",
        state.store.create(&input),
    )
    .await?;

    tracing::info!(
        order_id = %order.id_order,
        number_order = %order.number_order,
        item_count = order.items.len(),
        "Sales order created"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new("Sales order created successfully", order)),
    ))
}

/// GET /salesorder?page=&limit=
///
/// List all orders, newest first.
pub async fn list_sales_orders(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let page = PageRequest::from_params(params.page.as_deref(), params.limit.as_deref())?;

    let result = with_deadline(
        state.config.store_timeout,
        "list_sales_orders",
        state.store.list(page),
    )
    .await?;

    Ok(Json(PageResponse::new(
        "Sales orders retrieved successfully",
        page,
        result.count,
        result.orders,
    )))
}

/// GET /salesorder/search?keywords=&date=&page=&limit=
///
/// Filter by keyword (order number or customer) and/or order day.
pub async fn search_sales_orders(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let Query(params) = params?;
    let filter = SearchFilter::from_params(params.keywords.as_deref(), params.date.as_deref())?;
    let page = PageRequest::from_params(params.page.as_deref(), params.limit.as_deref())?;

    let result = with_deadline(
        state.config.store_timeout,
        "search_sales_orders",
        state.store.search(&filter, page),
    )
    .await?;

    tracing::debug!(
        keywords = ?filter.keywords,
        date = ?filter.date,
        count = result.count,
        page = page.page(),
        "Sales order search"
    );

    Ok(Json(PageResponse::new(
        "Sales orders retrieved successfully",
        page,
        result.count,
        result.orders,
    )))
}

/// GET /salesorder/{id}
pub async fn get_sales_order(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let order = with_deadline(
        state.config.store_timeout,
        "get_sales_order",
        state.store.find_by_id(&id),
    )
    .await?
    .ok_or_else(|| not_found(&id))?;

    Ok(Json(DataResponse::new(
        "Sales order retrieved successfully",
        order,
    )))
}

/// PUT /salesorder/{id}
///
/// Replace the header and the full item set.
pub async fn update_sales_order(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
    payload: Result<Json<SalesOrderInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let Json(input) = payload?;
    input.validate()?;

    let order = with_deadline(
        state.config.store_timeout,
        "update_sales_order",
        state.store.update(&id, &input),
    )
    .await?
    .ok_or_else(|| not_found(&id))?;

    tracing::info!(
        order_id = %order.id_order,
        item_count = order.items.len(),
        "Sales order updated"
    );

    Ok(Json(DataResponse::new("Sales order updated successfully", order)))
}

/// DELETE /salesorder/{id}
pub async fn delete_sales_order(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(id) = id?;
    let deleted = with_deadline(
        state.config.store_timeout,
        "delete_sales_order",
        state.store.delete(&id),
    )
    .await?;

    if !deleted {
        return Err(not_found(&id));
    }

    tracing::info!(order_id = %id, "Sales order deleted");

    Ok(StatusCode::NO_CONTENT)
}
