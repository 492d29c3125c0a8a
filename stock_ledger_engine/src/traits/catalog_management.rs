use crate::{
    db_types::{NewProduct, Product},
    traits::StockLedgerError,
};

/// The `CatalogManagement` trait covers the per-account product catalog: adding products, restocking,
/// listing, and the atomic conditional stock decrement that the reservation flow is built on.
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Appends a new product to the account's catalog and returns it with its freshly assigned id.
    /// Input validation is the caller's concern; backends may assume a well-formed product.
    async fn insert_product(&self, account_id: i64, product: NewProduct) -> Result<Product, StockLedgerError>;

    /// Returns the account's full catalog, oldest product first. An account with no products yields an
    /// empty vector, not an error.
    async fn fetch_products_for_account(&self, account_id: i64) -> Result<Vec<Product>, StockLedgerError>;

    /// Global product lookup. The returned product carries its owning `account_id`.
    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, StockLedgerError>;

    /// Adds `extra_quantity` to the product's quantity on hand. The product must belong to
    /// `account_id`. Fails with [`StockLedgerError::ProductNotFound`] if there is no matching product
    /// in the account's catalog.
    async fn restock_product(
        &self,
        account_id: i64,
        product_id: i64,
        extra_quantity: i64,
    ) -> Result<Product, StockLedgerError>;

    /// Atomic check-and-decrement of the product's stock. Fails with
    /// [`StockLedgerError::InsufficientStock`] if `quantity` exceeds the quantity on hand, leaving the
    /// stock untouched. Returns the new quantity on hand.
    ///
    /// Backends must implement this as a single storage-level conditional update, never as a read
    /// followed by a write.
    async fn decrement_if_available(&self, product_id: i64, quantity: i64) -> Result<i64, StockLedgerError>;
}
