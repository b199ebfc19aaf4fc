//! SQLite backend for the vitae résumé store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. That single connection thread
//! is also what serialises writes: mutating statements, including whole
//! transaction spans, execute one at a time, so concurrent callers never
//! observe a transaction's partial writes.

mod db;
mod schema;
mod store;

pub mod error;
pub mod params;

pub use db::Database;
pub use error::{Error, Result};
pub use store::SqliteResumeStore;

#[cfg(test)]
mod tests;
