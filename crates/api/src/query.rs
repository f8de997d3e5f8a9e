//! Shared query parameter types for API handlers.
//!
//! Numeric parameters are taken as raw strings and parsed by
//! `salesorder_core::pagination` so malformed values become validation
//! errors with a stable message.

use serde::Deserialize;

/// Pagination parameters (`?page=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Search parameters (`?keywords=&date=YYYY-MM-DD&page=&limit=`).
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub keywords: Option<String>,
    pub date: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}
