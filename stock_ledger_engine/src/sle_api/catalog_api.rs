//! Unifies API for managing the per-account product catalog.
use std::fmt::Debug;

use log::debug;

use crate::{
    db_types::{NewProduct, Product},
    traits::{CatalogManagement, StockLedgerError},
};

/// The `CatalogApi` validates and executes catalog mutations: adding products, restocking, and
/// listing. Stock only ever *decreases* through the reservation flow ([`crate::OrderFlowApi`]); this
/// API can only add to it.
pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Adds a new product to the account's catalog and returns the full updated catalog.
    ///
    /// All text fields must be non-empty and all numeric fields non-negative, otherwise the call
    /// fails with [`StockLedgerError::ValidationError`] and nothing is persisted.
    pub async fn add_product(&self, account_id: i64, product: NewProduct) -> Result<Vec<Product>, StockLedgerError> {
        validate_new_product(&product)?;
        let product = self.db.insert_product(account_id, product).await?;
        debug!("📦️ Product #{} added for account #{account_id}", product.id);
        self.db.fetch_products_for_account(account_id).await
    }

    /// Adds `extra_quantity` (> 0) to an existing product's stock and returns the updated product.
    pub async fn restock(
        &self,
        account_id: i64,
        product_id: i64,
        extra_quantity: i64,
    ) -> Result<Product, StockLedgerError> {
        if extra_quantity <= 0 {
            return Err(StockLedgerError::ValidationError(format!(
                "Restock quantity must be positive, got {extra_quantity}"
            )));
        }
        self.db.restock_product(account_id, product_id, extra_quantity).await
    }

    /// Returns the account's catalog. An account that has never added a product gets an empty vector.
    pub async fn list_products(&self, account_id: i64) -> Result<Vec<Product>, StockLedgerError> {
        self.db.fetch_products_for_account(account_id).await
    }

    /// Global product lookup. The result carries the owning `account_id`.
    pub async fn find_product(&self, product_id: i64) -> Result<Product, StockLedgerError> {
        self.db.fetch_product(product_id).await?.ok_or(StockLedgerError::ProductNotFound(product_id))
    }
}

fn validate_new_product(product: &NewProduct) -> Result<(), StockLedgerError> {
    let required = [
        ("name", &product.name),
        ("category", &product.category),
        ("item_type", &product.item_type),
        ("image_ref", &product.image_ref),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(StockLedgerError::ValidationError(format!("Product field '{field}' is required")));
        }
    }
    if product.selling_price.is_negative() {
        return Err(StockLedgerError::ValidationError("Selling price cannot be negative".to_string()));
    }
    if product.cost_price.map(|p| p.is_negative()).unwrap_or(false) {
        return Err(StockLedgerError::ValidationError("Cost price cannot be negative".to_string()));
    }
    if product.quantity_on_hand < 0 {
        return Err(StockLedgerError::ValidationError("Quantity on hand cannot be negative".to_string()));
    }
    Ok(())
}
