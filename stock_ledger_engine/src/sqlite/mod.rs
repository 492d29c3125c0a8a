//! SQLite database module for the stock ledger engine.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;
