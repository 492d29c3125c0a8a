use thiserror::Error;

use crate::{
    db_types::{Account, FullOrder, Order, OrderItem},
    sle_api::order_objects::OrderQueryFilter,
};

/// The `AccountManagement` trait provides read-side queries over accounts, orders and order items.
/// These methods never mutate state.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Fetches the account for the given id. If no account exists, `None` is returned.
    async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, AccountApiError>;

    /// Fetches the account registered under the given email address, if any.
    async fn fetch_account_by_email(&self, email: &str) -> Result<Option<Account>, AccountApiError>;

    /// Fetches a single order together with its items.
    async fn fetch_order(&self, order_id: i64) -> Result<Option<FullOrder>, AccountApiError>;

    /// Fetches all orders in which the account participates as buyer or seller, newest first, each
    /// with its items.
    async fn fetch_orders_for_account(&self, account_id: i64) -> Result<Vec<FullOrder>, AccountApiError>;

    /// Fetches order records according to the criteria in the filter, oldest first.
    async fn search_orders(&self, query: OrderQueryFilter) -> Result<Vec<Order>, AccountApiError>;

    /// Fetches every order item for which the account is the seller, across all orders. This is the
    /// seller-scoped item set that summaries are computed over.
    async fn fetch_items_for_seller(&self, seller_id: i64) -> Result<Vec<OrderItem>, AccountApiError>;
}

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User error constructing query: {0}")]
    QueryError(String),
    #[error("The requested account id {0} does not exist")]
    AccountNotFound(i64),
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}
