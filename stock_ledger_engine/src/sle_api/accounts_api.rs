//! Unifies API for accessing accounts, order history and summaries.
use std::fmt::Debug;

use log::trace;

use crate::{
    db_types::{Account, FullOrder, Order},
    sle_api::{
        order_objects::OrderQueryFilter,
        summary::{self, LedgerSummary},
    },
    traits::{AccountApiError, AccountManagement, CatalogManagement, StockLedgerError},
};

/// The `AccountApi` provides a unified read-side API: account lookups, order history, and the
/// on-demand profit/sales summary.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement + CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the account for the given account id. If no account exists, `None` is returned.
    pub async fn account_by_id(&self, account_id: i64) -> Result<Option<Account>, AccountApiError> {
        self.db.fetch_account(account_id).await
    }

    /// Fetches the account registered under the given email address, if any.
    pub async fn account_by_email(&self, email: &str) -> Result<Option<Account>, AccountApiError> {
        self.db.fetch_account_by_email(email).await
    }

    /// Fetches a single order with its items.
    pub async fn order_by_id(&self, order_id: i64) -> Result<Option<FullOrder>, AccountApiError> {
        self.db.fetch_order(order_id).await
    }

    /// All orders the account participates in, as buyer or seller, newest first.
    pub async fn orders_for_account(&self, account_id: i64) -> Result<Vec<FullOrder>, AccountApiError> {
        let orders = self.db.fetch_orders_for_account(account_id).await?;
        trace!("🧑️ Account #{account_id} has {} order(s)", orders.len());
        Ok(orders)
    }

    pub async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, AccountApiError> {
        self.db.search_orders(query).await
    }

    /// Derives the per-product and account-wide sales summary for the account.
    ///
    /// Joins the account's catalog with the order items it sells. "Sold" counts only the
    /// seller-scoped items (`item.seller_id == account_id`) with `Completed` status; pending items
    /// land in the in-progress buckets. An account with no catalog gets an all-zero summary with an
    /// empty product list.
    pub async fn summary_for_account(&self, account_id: i64) -> Result<LedgerSummary, StockLedgerError> {
        let products = self.db.fetch_products_for_account(account_id).await?;
        let items = self.db.fetch_items_for_seller(account_id).await?;
        trace!("🧑️ Summarising {} product(s) and {} item(s) for account #{account_id}", products.len(), items.len());
        Ok(summary::aggregate(products, &items))
    }
}
