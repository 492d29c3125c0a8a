//! # Backend contracts
//!
//! This module defines the interface contracts that storage *backends* must implement to power the
//! stock ledger engine.
//!
//! ## Catalog and ledger
//! Every account owns one catalog of products. Reservations decrement catalog stock and record (or
//! merge into) order lines in the account's ledger.
//!
//! The [`StockLedgerDatabase`] trait carries the transactional flows: the multi-line reservation and
//! the item status transition. Backends must execute a reservation as a single atomic unit: either
//! every line is applied, or no stock moves at all.
//!
//! The [`CatalogManagement`] trait covers the per-account product catalog, including the atomic
//! conditional stock decrement.
//!
//! The [`AccountManagement`] trait provides read-side queries over accounts, orders and order items.
//!
//! The [`AuthManagement`] trait covers account registration and credential lookup.
mod account_management;
mod auth_management;
mod catalog_management;
mod stock_ledger_database;

pub use account_management::{AccountApiError, AccountManagement};
pub use auth_management::{AuthApiError, AuthManagement};
pub use catalog_management::CatalogManagement;
pub use stock_ledger_database::{StockLedgerDatabase, StockLedgerError};
