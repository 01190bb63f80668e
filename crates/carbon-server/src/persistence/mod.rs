//! Persistence layer for the carbon server.
//!
//! SQLite-backed storage for user accounts and saved route searches.

pub mod db;
pub mod searches;
pub mod users;

pub use db::{init_database, Database};
