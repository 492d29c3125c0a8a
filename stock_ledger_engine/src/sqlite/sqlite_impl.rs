//! `SqliteDatabase` is a concrete implementation of a stock ledger engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{accounts, catalog, db_url, new_pool, orders};
use crate::{
    db_types::{
        Account,
        AccountCredentials,
        FullOrder,
        ItemStatus,
        NewAccount,
        NewProduct,
        Order,
        OrderItem,
        OwnershipMode,
        Product,
        ReservationLine,
    },
    sle_api::order_objects::OrderQueryFilter,
    traits::{
        AccountApiError,
        AccountManagement,
        AuthApiError,
        AuthManagement,
        CatalogManagement,
        StockLedgerDatabase,
        StockLedgerError,
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool using the database URL from the `SLE_DATABASE_URL` environment
    /// variable (or the default if unset).
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl StockLedgerDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Processes the entire reservation inside one transaction. Any line failure returns early, the
    /// transaction is dropped, and every prior decrement in the request rolls back with it. Stock is
    /// never decremented for a rejected reservation.
    async fn process_reservation(
        &self,
        buyer: &Account,
        lines: &[ReservationLine],
        mode: OwnershipMode,
    ) -> Result<Vec<FullOrder>, StockLedgerError> {
        let mut tx = self.pool.begin().await?;
        let mut touched = Vec::new();
        for line in lines {
            let product = catalog::product_by_id(line.product_id, &mut tx)
                .await?
                .ok_or(StockLedgerError::ProductNotFound(line.product_id))?;
            if mode == OwnershipMode::SelfOrder && product.account_id != buyer.id {
                return Err(StockLedgerError::NotProductOwner { product_id: product.id });
            }
            let available = product.quantity_on_hand;
            if catalog::decrement_if_available(product.id, line.quantity, &mut tx).await?.is_none() {
                return Err(StockLedgerError::InsufficientStock {
                    product_id: product.id,
                    requested: line.quantity,
                    available,
                });
            }
            let seller_email = if product.account_id == buyer.id {
                buyer.email.clone()
            } else {
                accounts::account_by_id(product.account_id, &mut tx)
                    .await?
                    .ok_or(StockLedgerError::AccountNotFound(product.account_id))?
                    .email
            };
            let order = orders::upsert_order_for_pair(buyer, product.account_id, &mut tx).await?;
            match orders::item_for_product(order.id, product.id, &mut tx).await? {
                Some(item) => {
                    orders::merge_item(item.id, line.quantity, line.status, &mut tx)
                        .await?
                        .ok_or(StockLedgerError::OrderItemNotFound { order_id: order.id, item_id: item.id })?;
                },
                None => {
                    let status = line.status.unwrap_or(ItemStatus::Pending);
                    orders::insert_item(order.id, &product, &seller_email, line.quantity, status, &mut tx).await?;
                },
            }
            if !touched.contains(&order.id) {
                touched.push(order.id);
            }
            trace!("🛒️ Reserved {} of product #{} on order #{}", line.quantity, product.id, order.id);
        }
        touched.sort_unstable();
        let mut result = Vec::with_capacity(touched.len());
        for order_id in touched {
            let order = orders::recompute_grand_total(order_id, &mut tx).await?;
            let items = orders::items_for_order(order_id, &mut tx).await?;
            result.push(FullOrder { order, items });
        }
        tx.commit().await?;
        debug!("🛒️ Reservation for buyer #{} committed: {} line(s), {} order(s)", buyer.id, lines.len(), result.len());
        Ok(result)
    }

    async fn complete_order_item(
        &self,
        account_id: i64,
        order_id: i64,
        item_id: i64,
    ) -> Result<OrderItem, StockLedgerError> {
        let mut tx = self.pool.begin().await?;
        let _order =
            orders::order_by_id(order_id, &mut tx).await?.ok_or(StockLedgerError::OrderNotFound(order_id))?;
        let item = orders::item_by_id(order_id, item_id, &mut tx)
            .await?
            .ok_or(StockLedgerError::OrderItemNotFound { order_id, item_id })?;
        if item.seller_id != account_id {
            return Err(StockLedgerError::NotItemSeller { item_id });
        }
        if item.status != ItemStatus::Pending {
            return Err(StockLedgerError::InvalidStatusChange {
                item_id,
                from: item.status,
                to: ItemStatus::Completed,
            });
        }
        let updated = orders::set_item_status(item_id, ItemStatus::Completed, &mut tx)
            .await?
            .ok_or(StockLedgerError::OrderItemNotFound { order_id, item_id })?;
        tx.commit().await?;
        debug!("🛒️ Item #{item_id} on order #{order_id} marked as completed");
        Ok(updated)
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn insert_product(&self, account_id: i64, product: NewProduct) -> Result<Product, StockLedgerError> {
        let mut conn = self.pool.acquire().await?;
        catalog::insert_product(account_id, product, &mut conn).await
    }

    async fn fetch_products_for_account(&self, account_id: i64) -> Result<Vec<Product>, StockLedgerError> {
        let mut conn = self.pool.acquire().await?;
        let products = catalog::products_for_account(account_id, &mut conn).await?;
        Ok(products)
    }

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StockLedgerError> {
        let mut conn = self.pool.acquire().await?;
        let product = catalog::product_by_id(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn restock_product(
        &self,
        account_id: i64,
        product_id: i64,
        extra_quantity: i64,
    ) -> Result<Product, StockLedgerError> {
        let mut conn = self.pool.acquire().await?;
        catalog::restock(account_id, product_id, extra_quantity, &mut conn).await
    }

    async fn decrement_if_available(&self, product_id: i64, quantity: i64) -> Result<i64, StockLedgerError> {
        let mut tx = self.pool.begin().await?;
        let product = catalog::product_by_id(product_id, &mut tx)
            .await?
            .ok_or(StockLedgerError::ProductNotFound(product_id))?;
        let available = product.quantity_on_hand;
        let updated = catalog::decrement_if_available(product_id, quantity, &mut tx).await?.ok_or(
            StockLedgerError::InsufficientStock { product_id, requested: quantity, available },
        )?;
        tx.commit().await?;
        Ok(updated.quantity_on_hand)
    }
}

impl AccountManagement for SqliteDatabase {
    async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::account_by_id(account_id, &mut conn).await?;
        Ok(account)
    }

    async fn fetch_account_by_email(&self, email: &str) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let account = accounts::account_by_email(email, &mut conn).await?;
        Ok(account)
    }

    async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::order_by_id(order_id, &mut conn).await?;
        match order {
            Some(order) => {
                let items = orders::items_for_order(order.id, &mut conn).await?;
                Ok(Some(FullOrder { order, items }))
            },
            None => Ok(None),
        }
    }

    async fn fetch_orders_for_account(&self, account_id: i64) -> Result<Vec<FullOrder>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let order_rows = orders::orders_for_account(account_id, &mut conn).await?;
        let mut result = Vec::with_capacity(order_rows.len());
        for order in order_rows {
            let items = orders::items_for_order(order.id, &mut conn).await?;
            result.push(FullOrder { order, items });
        }
        Ok(result)
    }

    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(query, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_items_for_seller(&self, seller_id: i64) -> Result<Vec<OrderItem>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::items_for_seller(seller_id, &mut conn).await?;
        Ok(items)
    }
}

impl AuthManagement for SqliteDatabase {
    async fn create_account_with_credentials(
        &self,
        account: &NewAccount,
        digest: &str,
        salt: &str,
    ) -> Result<Account, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::insert_account(account, digest, salt, &mut conn).await
    }

    async fn fetch_credentials_by_email(&self, email: &str) -> Result<Option<AccountCredentials>, AuthApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::credentials_by_email(email, &mut conn).await
    }
}
