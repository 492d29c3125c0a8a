//! SQLite operations for the order ledger.
//!
//! Ledger identity is the (buyer, seller) composite key: there is exactly one order row per pair,
//! and at most one item row per (order, product). Reservations merge into existing rows rather than
//! appending duplicates, and grand totals are always recomputed from the items.
use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db_types::{Account, ItemStatus, Order, OrderItem, Product},
    sle_api::order_objects::OrderQueryFilter,
    traits::StockLedgerError,
};

/// Finds or creates the order row for the (buyer, seller) pair. The composite UNIQUE key makes this a
/// single atomic upsert.
pub async fn upsert_order_for_pair(
    buyer: &Account,
    seller_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Order, StockLedgerError> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (buyer_id, buyer_email, seller_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (buyer_id, seller_id) DO UPDATE SET updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(buyer.id)
    .bind(&buyer.email)
    .bind(seller_id)
    .fetch_one(conn)
    .await?;
    trace!("📝️ Ledger target for buyer #{} / seller #{seller_id} is order #{}", buyer.id, order.id);
    Ok(order)
}

pub async fn order_by_id(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await?;
    Ok(order)
}

/// Returns all orders in which the account participates as buyer or seller, newest first.
pub async fn orders_for_account(account_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders =
        sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1 OR seller_id = $1 ORDER BY ordered_at DESC, id DESC")
            .bind(account_id)
            .fetch_all(conn)
            .await?;
    Ok(orders)
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered by `ordered_at` in ascending order
pub async fn search_orders(query: OrderQueryFilter, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new(
        r#"
    SELECT * FROM orders
    "#,
    );
    if !query.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(buyer_id) = query.buyer_id {
        where_clause.push("buyer_id = ");
        where_clause.push_bind_unseparated(buyer_id);
    }
    if let Some(seller_id) = query.seller_id {
        where_clause.push("seller_id = ");
        where_clause.push_bind_unseparated(seller_id);
    }
    if let Some(since) = query.since {
        where_clause.push("ordered_at >= ");
        where_clause.push_bind_unseparated(since);
    }
    if let Some(until) = query.until {
        where_clause.push("ordered_at <= ");
        where_clause.push_bind_unseparated(until);
    }
    builder.push(" ORDER BY ordered_at ASC");

    trace!("📝️ Executing query: {}", builder.sql());
    let query = builder.build_query_as::<Order>();
    let orders = query.fetch_all(conn).await?;
    trace!("Result of search_orders: {:?}", orders.len());
    Ok(orders)
}

pub async fn items_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

pub async fn item_by_id(
    order_id: i64,
    item_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderItem>, sqlx::Error> {
    let item = sqlx::query_as("SELECT * FROM order_items WHERE id = $1 AND order_id = $2")
        .bind(item_id)
        .bind(order_id)
        .fetch_optional(conn)
        .await?;
    Ok(item)
}

/// Returns the existing item row for this product on this order, if any. The UNIQUE(order_id,
/// product_id) key guarantees at most one.
pub async fn item_for_product(
    order_id: i64,
    product_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderItem>, sqlx::Error> {
    let item = sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 AND product_id = $2")
        .bind(order_id)
        .bind(product_id)
        .fetch_optional(conn)
        .await?;
    Ok(item)
}

/// Every order item the account sells, across all orders. Input to the summary aggregation.
pub async fn items_for_seller(seller_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT * FROM order_items WHERE seller_id = $1 ORDER BY id ASC")
        .bind(seller_id)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Inserts a fresh item row, denormalizing product identity and pinning the unit price at the current
/// catalog price.
pub async fn insert_item(
    order_id: i64,
    product: &Product,
    seller_email: &str,
    quantity: i64,
    status: ItemStatus,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, StockLedgerError> {
    let item: OrderItem = sqlx::query_as(
        r#"
            INSERT INTO order_items (
                order_id,
                product_id,
                product_name,
                seller_id,
                seller_email,
                quantity_ordered,
                unit_price,
                total_price,
                status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(product.id)
    .bind(&product.name)
    .bind(product.account_id)
    .bind(seller_email)
    .bind(quantity)
    .bind(product.selling_price)
    .bind(product.selling_price * quantity)
    .bind(status)
    .fetch_one(conn)
    .await?;
    debug!("📝️ Item for product #{} added to order #{order_id} at unit price {}", product.id, item.unit_price);
    Ok(item)
}

/// Merges a repeat reservation into an existing item row: the quantity accumulates and the total is
/// recomputed from the unit price stored at first insertion; a changed catalog price never leaks in.
/// A supplied status overwrites the stored one; `None` keeps it.
pub async fn merge_item(
    item_id: i64,
    add_quantity: i64,
    status: Option<ItemStatus>,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderItem>, sqlx::Error> {
    let item: Option<OrderItem> = sqlx::query_as(
        r#"
            UPDATE order_items
            SET quantity_ordered = quantity_ordered + $1,
                total_price = (quantity_ordered + $1) * unit_price,
                status = COALESCE($2, status),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $3
            RETURNING *;
        "#,
    )
    .bind(add_quantity)
    .bind(status)
    .bind(item_id)
    .fetch_optional(conn)
    .await?;
    if let Some(item) = &item {
        trace!("📝️ Item #{item_id} merged. Quantity now {}, total {}", item.quantity_ordered, item.total_price);
    }
    Ok(item)
}

pub async fn set_item_status(
    item_id: i64,
    status: ItemStatus,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderItem>, sqlx::Error> {
    let item = sqlx::query_as(
        "UPDATE order_items SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(item_id)
    .fetch_optional(conn)
    .await?;
    Ok(item)
}

/// Recomputes the order's grand total as the sum of its item totals. Always derived, never trusted as
/// a running figure.
pub async fn recompute_grand_total(order_id: i64, conn: &mut SqliteConnection) -> Result<Order, StockLedgerError> {
    let order: Option<Order> = sqlx::query_as(
        r#"
            UPDATE orders
            SET grand_total = COALESCE((SELECT SUM(total_price) FROM order_items WHERE order_id = $1), 0),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    order.ok_or(StockLedgerError::OrderNotFound(order_id))
}
