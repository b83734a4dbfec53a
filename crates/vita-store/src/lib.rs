//! vita-store: SQLite persistence for vita
//!
//! This crate provides `SqliteStore`, the on-disk implementation of the
//! `UserStore` trait from vita-core.

pub mod sqlite;

pub use sqlite::SqliteStore;
