//! Shared response envelope types for API handlers.
//!
//! Single-entity responses use `{ message, status, data }`; list and search
//! responses add the paging fields `currentPage`, `totalPage`, `limit` and
//! `count`.

use salesorder_core::pagination::PageRequest;
use serde::Serialize;

/// Standard `{ "message", "status": true, "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub message: &'static str,
    pub status: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(message: &'static str, data: T) -> Self {
        Self {
            message,
            status: true,
            data,
        }
    }
}

/// Paged list envelope.
///
/// ```json
/// { "message": "...", "status": true, "data": [...],
///   "currentPage": 2, "totalPage": 4, "limit": 5, "count": 17 }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T: Serialize> {
    pub message: &'static str,
    pub status: bool,
    pub data: Vec<T>,
    pub current_page: i64,
    pub total_page: i64,
    pub limit: i64,
    pub count: i64,
}

impl<T: Serialize> PageResponse<T> {
    /// Wrap one page of rows; `totalPage` is derived from `count` and the page size.
    pub fn new(message: &'static str, page: PageRequest, count: i64, data: Vec<T>) -> Self {
        Self {
            message,
            status: true,
            data,
            current_page: page.page(),
            total_page: page.total_pages(count),
            limit: page.limit(),
            count,
        }
    }
}
