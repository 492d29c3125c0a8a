//! Stock Ledger Engine
//!
//! A multi-tenant inventory and order-ledger engine. Each business account keeps a product catalog;
//! reservations move stock out of the catalog and into an append-style order ledger, and an
//! aggregator derives sales and profit summaries from the two.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`] behind the `sqlite` feature). You should never
//!    need to access the database directly. Instead, use the public API provided by the engine. The
//!    exception is the data types used in the database, which are defined in the [`mod@db_types`]
//!    module and are public.
//! 2. The engine public API ([`mod@sle_api`]). This provides the public-facing functionality:
//!    accounts and authentication ([`AuthApi`], [`AccountApi`]), catalog management ([`CatalogApi`]),
//!    and the reservation flow ([`OrderFlowApi`]). Backends implement the traits in [`mod@traits`]
//!    in order to drive these APIs.
pub mod db_types;
pub mod helpers;
mod sle_api;
#[cfg(feature = "sqlite")]
mod sqlite;
#[cfg(feature = "sqlite")]
pub mod test_utils;
pub mod traits;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use sle_api::{
    accounts_api::AccountApi,
    auth_api::AuthApi,
    catalog_api::CatalogApi,
    order_flow_api::OrderFlowApi,
    order_objects,
    summary,
};
pub use traits::{
    AccountApiError,
    AccountManagement,
    AuthApiError,
    AuthManagement,
    CatalogManagement,
    StockLedgerDatabase,
    StockLedgerError,
};
