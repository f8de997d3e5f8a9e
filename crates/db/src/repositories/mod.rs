pub mod sales_order_repo;

pub use sales_order_repo::{SalesOrderRepo, SalesOrderStore};
