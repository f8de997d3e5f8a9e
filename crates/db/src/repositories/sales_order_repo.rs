//! Repository for the `sales_order` and `item_order` tables.
//!
//! Every multi-statement operation runs in a single transaction. A
//! `sqlx::Transaction` that is dropped before `commit()` (early `?` return,
//! cancelled future, panic) rolls back, so header and items are always
//! written or removed together.

use std::collections::HashMap;

use async_trait::async_trait;
use salesorder_core::pagination::PageRequest;
use salesorder_core::sales_order::SearchFilter;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder, Transaction};

use crate::models::sales_order::{ItemOrder, ItemOrderInput, OrderPage, SalesOrder, SalesOrderInput};

/// Column list for sales_order queries.
const ORDER_COLUMNS: &str = "id_order, number_order, date, customer, address";

/// Column list for item_order queries.
const ITEM_COLUMNS: &str = "id_item, id_order, item_name, qty, price, total";

/// Ordering shared by list and search so pagination is deterministic.
const ORDER_BY: &str = " ORDER BY date DESC, id_order ASC";

/// Read and write access to stored sales orders.
///
/// Implemented by [`SalesOrderRepo`] for PostgreSQL. Handlers depend on this
/// trait only, so the store handle is injected rather than global.
#[async_trait]
pub trait SalesOrderStore: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), sqlx::Error>;

    /// Persist a new order and all of its items atomically.
    async fn create(&self, input: &SalesOrderInput) -> Result<SalesOrder, sqlx::Error>;

    /// One page of all orders plus the total order count.
    async fn list(&self, page: PageRequest) -> Result<OrderPage, sqlx::Error>;

    /// Fetch one order with its items.
    async fn find_by_id(&self, id: &str) -> Result<Option<SalesOrder>, sqlx::Error>;

    /// One page of orders matching `filter` plus the total matching count.
    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<OrderPage, sqlx::Error>;

    /// Number of orders matching `filter`.
    async fn search_count(&self, filter: &SearchFilter) -> Result<i64, sqlx::Error>;

    /// Replace the header fields and the full item set of an order.
    ///
    /// Returns `None` when no order has the given id.
    async fn update(
        &self,
        id: &str,
        input: &SalesOrderInput,
    ) -> Result<Option<SalesOrder>, sqlx::Error>;

    /// Delete an order and its items. Returns `true` if the order existed.
    async fn delete(&self, id: &str) -> Result<bool, sqlx::Error>;
}

/// PostgreSQL-backed [`SalesOrderStore`].
#[derive(Debug, Clone)]
pub struct SalesOrderRepo {
    pool: PgPool,
}

impl SalesOrderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a read-only transaction whose reads all see one snapshot.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    /// Count and fetch a page within one snapshot.
    async fn read_page(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<OrderPage, sqlx::Error> {
        let mut tx = self.begin_snapshot().await?;

        let count = count_matching(&mut tx, filter).await?;
        let mut orders = if count > 0 {
            fetch_matching(&mut tx, filter, page).await?
        } else {
            Vec::new()
        };
        attach_items(&mut tx, &mut orders).await?;

        tx.commit().await?;
        Ok(OrderPage { count, orders })
    }
}

#[async_trait]
impl SalesOrderStore for SalesOrderRepo {
    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    async fn create(&self, input: &SalesOrderInput) -> Result<SalesOrder, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "INSERT INTO sales_order ({ORDER_COLUMNS})
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ORDER_COLUMNS}"
        );
        let mut order = sqlx::query_as::<_, SalesOrder>(&query)
            .bind(new_id())
            .bind(&input.number_order)
            .bind(input.date)
            .bind(&input.customer)
            .bind(&input.address)
            .fetch_one(&mut *tx)
            .await?;

        order.items = insert_items(&mut tx, &order.id_order, &input.items).await?;

        tx.commit().await?;

        tracing::debug!(
            order_id = %order.id_order,
            item_count = order.items.len(),
            "Sales order inserted"
        );
        Ok(order)
    }

    async fn list(&self, page: PageRequest) -> Result<OrderPage, sqlx::Error> {
        self.read_page(&SearchFilter::default(), page).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<SalesOrder>, sqlx::Error> {
        let mut tx = self.begin_snapshot().await?;

        let query = format!("SELECT {ORDER_COLUMNS} FROM sales_order WHERE id_order = $1");
        let order = sqlx::query_as::<_, SalesOrder>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let order = match order {
            Some(mut order) => {
                order.items = fetch_items(&mut tx, &order.id_order).await?;
                Some(order)
            }
            None => None,
        };

        tx.commit().await?;
        Ok(order)
    }

    async fn search(
        &self,
        filter: &SearchFilter,
        page: PageRequest,
    ) -> Result<OrderPage, sqlx::Error> {
        self.read_page(filter, page).await
    }

    async fn search_count(&self, filter: &SearchFilter) -> Result<i64, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        count_matching(&mut conn, filter).await
    }

    async fn update(
        &self,
        id: &str,
        input: &SalesOrderInput,
    ) -> Result<Option<SalesOrder>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "UPDATE sales_order SET
                number_order = $2,
                date = $3,
                customer = $4,
                address = $5
             WHERE id_order = $1
             RETURNING {ORDER_COLUMNS}"
        );
        let Some(mut order) = sqlx::query_as::<_, SalesOrder>(&query)
            .bind(id)
            .bind(&input.number_order)
            .bind(input.date)
            .bind(&input.customer)
            .bind(&input.address)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let removed = sqlx::query("DELETE FROM item_order WHERE id_order = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        order.items = insert_items(&mut tx, &order.id_order, &input.items).await?;

        tx.commit().await?;

        tracing::debug!(
            order_id = %order.id_order,
            removed_items = removed,
            inserted_items = order.items.len(),
            "Sales order replaced"
        );
        Ok(Some(order))
    }

    async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let removed_items = sqlx::query("DELETE FROM item_order WHERE id_order = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let result = sqlx::query("DELETE FROM sales_order WHERE id_order = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;

        tracing::debug!(order_id = %id, removed_items, "Sales order deleted");
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Statement helpers (run on whatever connection or transaction is passed in)
// ---------------------------------------------------------------------------

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Append the `WHERE` clause for `filter`. Absent filters match all rows.
fn push_search_predicate(builder: &mut QueryBuilder<'_, Postgres>, filter: &SearchFilter) {
    builder.push(" WHERE TRUE");

    if let Some(pattern) = filter.keyword_pattern() {
        builder.push(" AND (number_order LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR customer LIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(date) = filter.date {
        builder.push(" AND (date AT TIME ZONE 'UTC')::date = ");
        builder.push_bind(date);
    }
}

async fn count_matching(
    conn: &mut PgConnection,
    filter: &SearchFilter,
) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM sales_order");
    push_search_predicate(&mut builder, filter);
    builder
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await
}

async fn fetch_matching(
    conn: &mut PgConnection,
    filter: &SearchFilter,
    page: PageRequest,
) -> Result<Vec<SalesOrder>, sqlx::Error> {
    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {ORDER_COLUMNS} FROM sales_order"));
    push_search_predicate(&mut builder, filter);
    builder.push(ORDER_BY);
    builder.push(" LIMIT ");
    builder.push_bind(page.limit());
    builder.push(" OFFSET ");
    builder.push_bind(page.offset());

    builder
        .build_query_as::<SalesOrder>()
        .fetch_all(&mut *conn)
        .await
}

async fn fetch_items(conn: &mut PgConnection, id_order: &str) -> Result<Vec<ItemOrder>, sqlx::Error> {
    let query = format!(
        "SELECT {ITEM_COLUMNS} FROM item_order
         WHERE id_order = $1
         ORDER BY line_no ASC"
    );
    sqlx::query_as::<_, ItemOrder>(&query)
        .bind(id_order)
        .fetch_all(&mut *conn)
        .await
}

/// Load items for every order in `orders` with a single query.
async fn attach_items(
    conn: &mut PgConnection,
    orders: &mut [SalesOrder],
) -> Result<(), sqlx::Error> {
    if orders.is_empty() {
        return Ok(());
    }

    let ids: Vec<String> = orders.iter().map(|o| o.id_order.clone()).collect();
    let query = format!(
        "SELECT {ITEM_COLUMNS} FROM item_order
         WHERE id_order = ANY($1)
         ORDER BY id_order, line_no ASC"
    );
    let items = sqlx::query_as::<_, ItemOrder>(&query)
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;

    let mut by_order: HashMap<String, Vec<ItemOrder>> = HashMap::new();
    for item in items {
        by_order.entry(item.id_order.clone()).or_default().push(item);
    }
    for order in orders.iter_mut() {
        order.items = by_order.remove(&order.id_order).unwrap_or_default();
    }
    Ok(())
}

/// Insert `items` for an order with fresh ids, preserving their order.
async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    id_order: &str,
    items: &[ItemOrderInput],
) -> Result<Vec<ItemOrder>, sqlx::Error> {
    let query = format!(
        "INSERT INTO item_order (id_item, id_order, line_no, item_name, qty, price, total)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {ITEM_COLUMNS}"
    );

    let mut inserted = Vec::with_capacity(items.len());
    for (line_no, item) in (1_i32..).zip(items) {
        let row = sqlx::query_as::<_, ItemOrder>(&query)
            .bind(new_id())
            .bind(id_order)
            .bind(line_no)
            .bind(&item.item_name)
            .bind(item.qty)
            .bind(item.price)
            .bind(item.total)
            .fetch_one(&mut **tx)
            .await?;
        inserted.push(row);
    }
    Ok(inserted)
}
