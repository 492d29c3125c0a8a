use thiserror::Error;

use crate::{
    db_types::{Account, FullOrder, ItemStatus, OrderItem, OwnershipMode, ReservationLine},
    traits::{AccountApiError, AccountManagement, CatalogManagement},
};

/// This trait defines the highest level of behaviour for backends supporting the stock ledger engine.
///
/// This behaviour includes:
/// * Processing reservation requests: validating availability, decrementing stock and writing or
///   merging the corresponding ledger entries as one atomic unit.
/// * Transitioning order items through their lifecycle.
#[allow(async_fn_in_trait)]
pub trait StockLedgerDatabase: Clone + AccountManagement + CatalogManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Processes a reservation request for the given buyer as a single atomic transaction.
    ///
    /// For every line, the backend must:
    /// 1. Resolve the product, failing with [`StockLedgerError::ProductNotFound`] if it is absent.
    /// 2. Enforce the ownership rule for `mode`. In [`OwnershipMode::SelfOrder`], a product owned by
    ///    another account fails the call with [`StockLedgerError::NotProductOwner`].
    /// 3. Decrement stock with a storage-level conditional update, failing with
    ///    [`StockLedgerError::InsufficientStock`] if the requested quantity exceeds the quantity on
    ///    hand.
    /// 4. Find or create the order for the (buyer, seller) pair, and merge the line into it: an
    ///    existing item for the product accumulates quantity at its stored unit price; a new item is
    ///    inserted at the current catalog price with status `Pending` unless the line supplies one.
    ///
    /// After all lines are applied, each touched order's grand total is recomputed from its items.
    ///
    /// Any failure aborts the entire request: stock is never decremented for a rejected reservation.
    ///
    /// Returns the full orders (one per distinct seller; exactly one in self-order mode) that the
    /// request touched, in order id order.
    async fn process_reservation(
        &self,
        buyer: &Account,
        lines: &[ReservationLine],
        mode: OwnershipMode,
    ) -> Result<Vec<FullOrder>, StockLedgerError>;

    /// Transitions the given order item from `Pending` to `Completed`.
    ///
    /// The acting account must be the item's seller, and the item must currently be `Pending`.
    /// `Pending → Completed` is the only legal transition; there is no way back.
    ///
    /// Returns the updated item.
    async fn complete_order_item(
        &self,
        account_id: i64,
        order_id: i64,
        item_id: i64,
    ) -> Result<OrderItem, StockLedgerError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), StockLedgerError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum StockLedgerError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("Invalid request: {0}")]
    ValidationError(String),
    #[error("The requested account id {0} does not exist")]
    AccountNotFound(i64),
    #[error("The requested product {0} does not exist")]
    ProductNotFound(i64),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Order item {item_id} does not exist on order {order_id}")]
    OrderItemNotFound { order_id: i64, item_id: i64 },
    #[error("Not enough stock for product {product_id}. Requested {requested}, available {available}")]
    InsufficientStock { product_id: i64, requested: i64, available: i64 },
    #[error("Product {product_id} belongs to another account")]
    NotProductOwner { product_id: i64 },
    #[error("Order item {item_id} is sold by another account")]
    NotItemSeller { item_id: i64 },
    #[error("Illegal status change for item {item_id}: {from} -> {to}")]
    InvalidStatusChange { item_id: i64, from: ItemStatus, to: ItemStatus },
    #[error("{0}")]
    AccountError(#[from] AccountApiError),
}

impl From<sqlx::Error> for StockLedgerError {
    fn from(e: sqlx::Error) -> Self {
        StockLedgerError::DatabaseError(e.to_string())
    }
}
