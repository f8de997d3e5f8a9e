//! Page/limit parsing and page arithmetic for list and search endpoints.
//!
//! Query values arrive as raw strings so that malformed input can be
//! rejected with a validation error instead of being silently defaulted.

use crate::error::CoreError;

/// Page used when the `page` query parameter is absent.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the `limit` query parameter is absent.
pub const DEFAULT_LIMIT: i64 = 5;

/// A validated 1-based page request. Both fields are always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    /// Build a page request, rejecting non-positive values.
    pub fn new(page: i64, limit: i64) -> Result<Self, CoreError> {
        if page < 1 {
            return Err(CoreError::Validation("Invalid page parameter".to_string()));
        }
        if limit < 1 {
            return Err(CoreError::Validation("Invalid limit parameter".to_string()));
        }
        Ok(Self { page, limit })
    }

    /// Parse raw `page` / `limit` query values.
    ///
    /// Absent or empty values fall back to [`DEFAULT_PAGE`] / [`DEFAULT_LIMIT`].
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Result<Self, CoreError> {
        let page = parse_positive("page", page, DEFAULT_PAGE)?;
        let limit = parse_positive("limit", limit, DEFAULT_LIMIT)?;
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Row offset of the first row on this page: `(page - 1) * limit`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Number of pages needed to show `count` rows, i.e. `ceil(count / limit)`.
    pub fn total_pages(&self, count: i64) -> i64 {
        if count <= 0 {
            return 0;
        }
        count / self.limit + i64::from(count % self.limit != 0)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: i64) -> Result<i64, CoreError> {
    match raw {
        None | Some("") => Ok(default),
        Some(value) => match value.parse::<i64>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(CoreError::Validation(format!("Invalid {name} parameter"))),
        },
    }
}
