//! Domain primitives for the sales order service.
//!
//! Zero internal dependencies: shared by the repository layer and the HTTP
//! handlers for id/timestamp types, pagination maths, and input validation.

pub mod error;
pub mod pagination;
pub mod sales_order;
pub mod types;
