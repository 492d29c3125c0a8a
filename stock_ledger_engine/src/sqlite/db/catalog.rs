//! SQLite operations for the per-account product catalog.
//!
//! The one rule that matters here: stock is only ever reduced through [`decrement_if_available`],
//! which re-states the availability check inside the UPDATE itself. There is no read-compute-write
//! path for `quantity_on_hand` anywhere in the engine.
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewProduct, Product},
    traits::StockLedgerError,
};

pub async fn insert_product(
    account_id: i64,
    product: NewProduct,
    conn: &mut SqliteConnection,
) -> Result<Product, StockLedgerError> {
    let product: Product = sqlx::query_as(
        r#"
            INSERT INTO products (
                account_id,
                name,
                category,
                item_type,
                image_ref,
                selling_price,
                cost_price,
                quantity_on_hand
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *;
        "#,
    )
    .bind(account_id)
    .bind(product.name)
    .bind(product.category)
    .bind(product.item_type)
    .bind(product.image_ref)
    .bind(product.selling_price)
    .bind(product.cost_price)
    .bind(product.quantity_on_hand)
    .fetch_one(conn)
    .await?;
    debug!("📦️ Product [{}] added to catalog of account #{account_id} with id {}", product.name, product.id);
    Ok(product)
}

pub async fn products_for_account(
    account_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Product>, sqlx::Error> {
    let products = sqlx::query_as("SELECT * FROM products WHERE account_id = $1 ORDER BY id ASC")
        .bind(account_id)
        .fetch_all(conn)
        .await?;
    Ok(products)
}

pub async fn product_by_id(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

/// Adds `extra_quantity` to the product's stock. The product must belong to `account_id`; restocking
/// another account's product reports [`StockLedgerError::ProductNotFound`], the same as a missing id.
pub async fn restock(
    account_id: i64,
    product_id: i64,
    extra_quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Product, StockLedgerError> {
    let product: Option<Product> = sqlx::query_as(
        r#"
            UPDATE products
            SET quantity_on_hand = quantity_on_hand + $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND account_id = $3
            RETURNING *;
        "#,
    )
    .bind(extra_quantity)
    .bind(product_id)
    .bind(account_id)
    .fetch_optional(conn)
    .await?;
    let product = product.ok_or(StockLedgerError::ProductNotFound(product_id))?;
    debug!("📦️ Product #{product_id} restocked by {extra_quantity}. On hand: {}", product.quantity_on_hand);
    Ok(product)
}

/// Atomic check-and-decrement. The availability guard lives in the WHERE clause, so two concurrent
/// reservations can never both pass the check and overdraw the stock. Returns `None` when the guard
/// fails; the caller decides how to report the shortfall.
pub async fn decrement_if_available(
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Product>, sqlx::Error> {
    let product = sqlx::query_as(
        r#"
            UPDATE products
            SET quantity_on_hand = quantity_on_hand - $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND quantity_on_hand >= $1
            RETURNING *;
        "#,
    )
    .bind(quantity)
    .bind(product_id)
    .fetch_optional(conn)
    .await?;
    Ok(product)
}
