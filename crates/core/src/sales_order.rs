//! Sales order constants, field validators, and search filter parsing.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Entity label used in not-found errors.
pub const SALES_ORDER_ENTITY: &str = "SalesOrder";

/// Maximum length of an order number.
pub const MAX_NUMBER_ORDER_LENGTH: usize = 64;

/// Maximum length of a customer name.
pub const MAX_CUSTOMER_LENGTH: usize = 255;

/// Maximum length of a shipping address.
pub const MAX_ADDRESS_LENGTH: usize = 1_000;

/// Maximum length of a line item name.
pub const MAX_ITEM_NAME_LENGTH: usize = 255;

/// Accepted format of the `date` search parameter.
pub const SEARCH_DATE_FORMAT: &str = "%Y-%m-%d";

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

fn validate_required_text(field: &str, value: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    if value.chars().count() > max_len {
        return Err(format!(
            "{field} exceeds maximum length of {max_len} characters"
        ));
    }
    Ok(())
}

/// Validate an order number: non-blank and within the length limit.
pub fn validate_number_order(number_order: &str) -> Result<(), String> {
    validate_required_text("number_order", number_order, MAX_NUMBER_ORDER_LENGTH)
}

/// Validate a customer name: non-blank and within the length limit.
pub fn validate_customer(customer: &str) -> Result<(), String> {
    validate_required_text("customer", customer, MAX_CUSTOMER_LENGTH)
}

/// Validate a shipping address. May be empty.
pub fn validate_address(address: &str) -> Result<(), String> {
    if address.chars().count() > MAX_ADDRESS_LENGTH {
        return Err(format!(
            "address exceeds maximum length of {MAX_ADDRESS_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate a line item name: non-blank and within the length limit.
pub fn validate_item_name(item_name: &str) -> Result<(), String> {
    validate_required_text("item_name", item_name, MAX_ITEM_NAME_LENGTH)
}

/// Quantities are non-negative integers.
pub fn validate_qty(qty: i32) -> Result<(), String> {
    if qty < 0 {
        return Err(format!("qty must be non-negative, got {qty}"));
    }
    Ok(())
}

/// Prices and totals are non-negative decimals.
pub fn validate_amount(field: &str, amount: &Decimal) -> Result<(), String> {
    if *amount < Decimal::ZERO {
        return Err(format!("{field} must be non-negative, got {amount}"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Search filter
// ---------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` search date.
pub fn parse_search_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), SEARCH_DATE_FORMAT)
        .map_err(|_| "Invalid date format, expected YYYY-MM-DD".to_string())
}

/// Escape `LIKE` metacharacters so the keyword matches as a literal substring.
///
/// Uses backslash, PostgreSQL's default `LIKE` escape character.
pub fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Optional keyword and day filters for order search. `None` matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub keywords: Option<String>,
    pub date: Option<NaiveDate>,
}

impl SearchFilter {
    /// Build a filter from raw query values.
    ///
    /// Blank keywords and blank dates are treated as absent. Any other
    /// keyword is kept verbatim, surrounding whitespace included. A non-blank
    /// date that is not `YYYY-MM-DD` is a validation error.
    pub fn from_params(keywords: Option<&str>, date: Option<&str>) -> Result<Self, CoreError> {
        let keywords = keywords
            .filter(|k| !k.trim().is_empty())
            .map(str::to_string);

        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => Some(parse_search_date(raw).map_err(CoreError::Validation)?),
            None => None,
        };

        Ok(Self { keywords, date })
    }

    /// `LIKE` pattern for the keyword filter, e.g. `%ACME%`.
    pub fn keyword_pattern(&self) -> Option<String> {
        self.keywords
            .as_deref()
            .map(|k| format!("%{}%", escape_like(k)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
