//! [`Database`] — the connection guard around a single SQLite handle.
//!
//! All statements funnel through the connection's dedicated worker thread,
//! which is the mutual-exclusion story: writes, including whole transaction
//! spans, run one at a time. Transactions use [`rusqlite::Transaction`]
//! directly — commit is explicit, and dropping the transaction on any other
//! control path (errors, panics) rolls it back. Nothing is ever left held.

use std::path::Path;

use rusqlite::OptionalExtension as _;

use crate::{Error, Result, params::Param, schema::SCHEMA};

/// Owns the single physical SQLite connection.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct Database {
  conn: tokio_rusqlite::Connection,
}

impl Database {
  /// Open (or create) a database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(|e| Error::Unavailable(e.to_string()))?;
    let db = Self { conn };
    db.init_schema().await?;
    Ok(db)
  }

  /// Open an in-memory database — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(|e| Error::Unavailable(e.to_string()))?;
    let db = Self { conn };
    db.init_schema().await?;
    Ok(db)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Execute a parameterized read and map every row.
  pub async fn query<T, F>(
    &self,
    sql: &str,
    params: Vec<Param>,
    map: F,
  ) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let sql = sql.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          let mut stmt = conn.prepare(&sql)?;
          let rows = stmt
            .query_map(rusqlite::params_from_iter(params), map)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
          Ok(rows)
        })
        .await?,
    )
  }

  /// Execute a parameterized read expected to match at most one row.
  pub async fn query_opt<T, F>(
    &self,
    sql: &str,
    params: Vec<Param>,
    map: F,
  ) -> Result<Option<T>>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let sql = sql.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(
            conn
              .query_row(&sql, rusqlite::params_from_iter(params), map)
              .optional()?,
          )
        })
        .await?,
    )
  }

  /// Execute a single mutating statement; returns rows affected.
  pub async fn execute(&self, sql: &str, params: Vec<Param>) -> Result<usize> {
    let sql = sql.to_owned();
    Ok(
      self
        .conn
        .call(move |conn| {
          Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?)
        })
        .await?,
    )
  }

  /// Like [`execute`](Database::execute), but returns the generated row id.
  pub async fn insert(&self, sql: &str, params: Vec<Param>) -> Result<i64> {
    let sql = sql.to_owned();
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(&sql, rusqlite::params_from_iter(params))?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    if id == 0 {
      return Err(Error::NoGeneratedKey);
    }
    Ok(id)
  }

  /// Run `f` inside a transaction on the connection thread.
  ///
  /// Commits on `Ok`. On `Err` the transaction is dropped, which rolls it
  /// back; the failure surfaces as [`Error::TransactionAborted`] naming
  /// `op`, except for logical outcomes (`NotFound`) and connection loss,
  /// which pass through unchanged.
  pub async fn with_tx<T, F>(&self, op: &'static str, f: F) -> Result<T>
  where
    T: Send + 'static,
    F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T> + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction().map_err(tokio_rusqlite::Error::Rusqlite)?;
        match f(&tx) {
          Ok(value) => {
            tx.commit().map_err(tokio_rusqlite::Error::Rusqlite)?;
            Ok(value)
          }
          Err(e) => Err(tokio_rusqlite::Error::Other(Box::new(e))),
        }
      })
      .await
      .map_err(|e| match Error::from(e) {
        e @ (Error::Statement(_) | Error::NoGeneratedKey) => {
          tracing::warn!(op, error = %e, "transaction rolled back");
          Error::TransactionAborted { op, source: Box::new(e) }
        }
        e => e,
      })
  }

  /// Orderly teardown: stop the connection thread and close the handle.
  pub async fn close(self) -> Result<()> {
    Ok(self.conn.close().await?)
  }
}
