//! Summary aggregation: derives per-product and account-wide sales statistics by joining the
//! account's catalog with the seller-scoped order items.
//!
//! The aggregation itself is a pure function over the two loaded sets. Sums are commutative, so the
//! result is independent of the order in which items were loaded; product rows follow catalog order.
use std::collections::HashMap;

use serde::Serialize;
use sle_common::Money;

use crate::db_types::{ItemStatus, OrderItem, Product};

/// Per-product summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSummary {
    pub product_id: i64,
    pub name: String,
    /// Current quantity on hand.
    pub in_stock: i64,
    /// Cumulative quantity on completed order items.
    pub sold: i64,
    /// Cumulative quantity on pending order items.
    pub in_progress: i64,
    /// Everything that ever entered the catalog: in stock + sold + in progress.
    pub total_ever_stocked: i64,
    pub cost_price: Option<Money>,
    pub selling_price: Money,
    /// Cost basis of everything ever stocked.
    pub total_cost: Money,
    /// Value of completed items, at the unit prices pinned when they were ordered.
    pub total_sales_value: Money,
    /// Value of pending items.
    pub total_in_progress_value: Money,
    /// Sales value less the cost of the sold quantity.
    pub profit: Money,
}

/// Account-wide summary: the per-product rows plus field-wise totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub products: Vec<ProductSummary>,
    pub total_in_stock: i64,
    pub total_sold: i64,
    pub total_in_progress: i64,
    pub total_cost: Money,
    pub total_sales_value: Money,
    pub total_in_progress_value: Money,
    pub total_profit: Money,
}

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    quantity: i64,
    value: Money,
}

/// Buckets the seller's order items by product and status, then folds the catalog into summary rows.
/// Items referencing products no longer in the catalog are ignored (products are never deleted in the
/// current scope, so this is a belt-and-braces filter rather than an expected path).
pub fn aggregate(products: Vec<Product>, items: &[OrderItem]) -> LedgerSummary {
    let mut sold: HashMap<i64, Bucket> = HashMap::new();
    let mut in_progress: HashMap<i64, Bucket> = HashMap::new();
    for item in items {
        let bucket = match item.status {
            ItemStatus::Completed => sold.entry(item.product_id).or_default(),
            ItemStatus::Pending => in_progress.entry(item.product_id).or_default(),
        };
        bucket.quantity += item.quantity_ordered;
        bucket.value = bucket.value + item.total_price;
    }

    let rows: Vec<ProductSummary> = products
        .into_iter()
        .map(|product| {
            let sold = sold.get(&product.id).copied().unwrap_or_default();
            let in_progress = in_progress.get(&product.id).copied().unwrap_or_default();
            let total_ever_stocked = product.quantity_on_hand + sold.quantity + in_progress.quantity;
            let cost = product.cost_price.unwrap_or_default();
            let total_cost = cost * total_ever_stocked;
            let profit = sold.value - cost * sold.quantity;
            ProductSummary {
                product_id: product.id,
                name: product.name,
                in_stock: product.quantity_on_hand,
                sold: sold.quantity,
                in_progress: in_progress.quantity,
                total_ever_stocked,
                cost_price: product.cost_price,
                selling_price: product.selling_price,
                total_cost,
                total_sales_value: sold.value,
                total_in_progress_value: in_progress.value,
                profit,
            }
        })
        .collect();
    let mut summary = LedgerSummary { products: rows, ..LedgerSummary::default() };
    for row in &summary.products {
        summary.total_in_stock += row.in_stock;
        summary.total_sold += row.sold;
        summary.total_in_progress += row.in_progress;
        summary.total_cost = summary.total_cost + row.total_cost;
        summary.total_sales_value = summary.total_sales_value + row.total_sales_value;
        summary.total_in_progress_value = summary.total_in_progress_value + row.total_in_progress_value;
        summary.total_profit = summary.total_profit + row.profit;
    }
    summary
}
