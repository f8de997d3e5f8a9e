//! Sales order header and line item models.

use rust_decimal::Decimal;
use salesorder_core::error::CoreError;
use salesorder_core::sales_order::{
    validate_address, validate_amount, validate_customer, validate_item_name,
    validate_number_order, validate_qty,
};
use salesorder_core::types::{OrderId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `item_order` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct ItemOrder {
    pub id_item: OrderId,
    pub id_order: OrderId,
    pub item_name: String,
    pub qty: i32,
    pub price: Decimal,
    pub total: Decimal,
}

/// A row from the `sales_order` table, with its line items attached.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct SalesOrder {
    pub id_order: OrderId,
    pub number_order: String,
    pub date: Timestamp,
    pub customer: String,
    pub address: String,
    /// Loaded separately from `item_order`, ordered by line position.
    #[sqlx(skip)]
    pub items: Vec<ItemOrder>,
}

/// One page of orders plus the total number of rows matching the query.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderPage {
    pub count: i64,
    pub orders: Vec<SalesOrder>,
}

/// DTO for a line item in a create or replace payload.
///
/// `total` is taken as given; callers are expected to send `price * qty`.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemOrderInput {
    pub item_name: String,
    pub qty: i32,
    pub price: Decimal,
    pub total: Decimal,
}

/// DTO for creating a sales order or fully replacing an existing one.
///
/// Identifiers are always server-generated; any `id_order` / `id_item`
/// fields in the request body are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesOrderInput {
    pub number_order: String,
    pub date: Timestamp,
    pub customer: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub items: Vec<ItemOrderInput>,
}

impl SalesOrderInput {
    /// Check header fields and every line item.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_number_order(&self.number_order).map_err(CoreError::Validation)?;
        validate_customer(&self.customer).map_err(CoreError::Validation)?;
        validate_address(&self.address).map_err(CoreError::Validation)?;

        for (index, item) in self.items.iter().enumerate() {
            item.validate()
                .map_err(|msg| CoreError::Validation(format!("items[{index}]: {msg}")))?;
        }
        Ok(())
    }
}

impl ItemOrderInput {
    fn validate(&self) -> Result<(), String> {
        validate_item_name(&self.item_name)?;
        validate_qty(self.qty)?;
        validate_amount("price", &self.price)?;
        validate_amount("total", &self.total)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn payload() -> serde_json::Value {
        json!({
            "number_order": "SO-1",
            "date": "2024-05-01T10:30:00Z",
            "customer": "Acme",
            "address": "1 Main St",
            "items": [
                {"item_name": "Widget", "qty": 2, "price": 10.0, "total": 20.0}
            ]
        })
    }

    #[test]
    fn deserializes_order_payload() {
        let input: SalesOrderInput = serde_json::from_value(payload()).unwrap();
        assert_eq!(input.number_order, "SO-1");
        assert_eq!(input.items.len(), 1);
        assert_eq!(input.items[0].qty, 2);
        assert_eq!(input.items[0].price, Decimal::new(10, 0));
        assert_eq!(input.items[0].total, Decimal::new(20, 0));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn client_supplied_ids_are_ignored() {
        let mut body = payload();
        body["id_order"] = json!("client-chosen");
        body["items"][0]["id_item"] = json!("client-item");
        let input: SalesOrderInput = serde_json::from_value(body).unwrap();
        assert_eq!(input.items.len(), 1);
    }

    #[test]
    fn missing_items_and_address_default_to_empty() {
        let input: SalesOrderInput = serde_json::from_value(json!({
            "number_order": "SO-2",
            "date": "2024-05-01T00:00:00Z",
            "customer": "Globex"
        }))
        .unwrap();
        assert!(input.items.is_empty());
        assert_eq!(input.address, "");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn negative_qty_reports_item_index() {
        let mut body = payload();
        body["items"][0]["qty"] = json!(-3);
        let input: SalesOrderInput = serde_json::from_value(body).unwrap();
        assert_matches!(
            input.validate(),
            Err(CoreError::Validation(msg)) if msg.starts_with("items[0]: qty")
        );
    }

    #[test]
    fn negative_price_rejected() {
        let mut body = payload();
        body["items"][0]["price"] = json!(-1.5);
        let input: SalesOrderInput = serde_json::from_value(body).unwrap();
        assert_matches!(input.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn blank_customer_rejected() {
        let mut body = payload();
        body["customer"] = json!("  ");
        let input: SalesOrderInput = serde_json::from_value(body).unwrap();
        assert_matches!(
            input.validate(),
            Err(CoreError::Validation(msg)) if msg == "customer cannot be empty"
        );
    }

    #[test]
    fn serializes_with_column_names() {
        let order = SalesOrder {
            id_order: "o-1".to_string(),
            number_order: "SO-1".to_string(),
            date: "2024-05-01T10:30:00Z".parse().unwrap(),
            customer: "Acme".to_string(),
            address: String::new(),
            items: vec![ItemOrder {
                id_item: "i-1".to_string(),
                id_order: "o-1".to_string(),
                item_name: "Widget".to_string(),
                qty: 2,
                price: Decimal::new(1000, 2),
                total: Decimal::new(2000, 2),
            }],
        };
        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["id_order"], "o-1");
        assert_eq!(value["items"][0]["id_item"], "i-1");
        assert_eq!(value["items"][0]["price"], 10.0);
        assert_eq!(value["items"][0]["total"], 20.0);
    }
}
