//! # Stock ledger engine public API
//!
//! The `sle_api` module exposes the programmatic API for the stock ledger engine.
//! The API is modular, so that clients of the API can pick and choose the functionality they want.
//!
//! * [`catalog_api`] manages the per-account product catalog: adding products, restocking and
//!   listing.
//! * [`order_flow_api`] is the transactional core: it validates and places reservations against the
//!   catalog, and transitions order items through their lifecycle.
//! * [`accounts_api`] provides read-side queries over accounts and orders, and derives the
//!   per-product and account-wide summaries.
//! * [`auth_api`] handles account registration and credential verification.
//!
//! # API usage
//!
//! The pattern for using all the APIs is the same. An API instance is created by supplying a database
//! backend that implements the specific backend traits required by the API.
//!
//! For example, to place a reservation:
//!
//! ```rust,ignore
//! use stock_ledger_engine::{db_types::{OwnershipMode, ReservationLine}, OrderFlowApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(...).await?;
//! // SqliteDatabase implements StockLedgerDatabase
//! let api = OrderFlowApi::new(db, OwnershipMode::SelfOrder);
//! let orders = api.place_order(buyer_id, &[ReservationLine::new(product_id, 3)]).await?;
//! ```

pub mod accounts_api;
pub mod auth_api;
pub mod catalog_api;
pub mod order_flow_api;
pub mod order_objects;
pub mod summary;
