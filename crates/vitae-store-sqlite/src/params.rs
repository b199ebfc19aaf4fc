//! Type-directed parameter binding.
//!
//! [`Param`] is an owned, `Send` statement parameter: each supported Rust
//! type binds to its native SQLite representation, never through a stringly
//! fallback. Owned parameters are what let a statement cross onto the
//! connection thread.
//!
//! Timestamps are stored as RFC 3339 UTC text; booleans as 0/1 integers.

use chrono::{DateTime, Utc};
use rusqlite::{
  ToSql,
  types::{ToSqlOutput, Value, ValueRef},
};

use crate::{Error, Result};

/// An owned statement parameter with its SQLite type decided at
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
  Null,
  Text(String),
  Integer(i64),
  Real(f64),
  Bool(bool),
  Timestamp(DateTime<Utc>),
}

impl ToSql for Param {
  fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
    Ok(match self {
      Param::Null => ToSqlOutput::Owned(Value::Null),
      Param::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
      Param::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
      Param::Real(r) => ToSqlOutput::Owned(Value::Real(*r)),
      Param::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
      Param::Timestamp(ts) => ToSqlOutput::Owned(Value::Text(encode_dt(*ts))),
    })
  }
}

impl From<&str> for Param {
  fn from(s: &str) -> Self { Param::Text(s.to_owned()) }
}

impl From<String> for Param {
  fn from(s: String) -> Self { Param::Text(s) }
}

impl From<Option<String>> for Param {
  fn from(s: Option<String>) -> Self { s.map_or(Param::Null, Param::Text) }
}

impl From<i32> for Param {
  fn from(i: i32) -> Self { Param::Integer(i64::from(i)) }
}

impl From<i64> for Param {
  fn from(i: i64) -> Self { Param::Integer(i) }
}

impl From<f64> for Param {
  fn from(r: f64) -> Self { Param::Real(r) }
}

impl From<bool> for Param {
  fn from(b: bool) -> Self { Param::Bool(b) }
}

impl From<DateTime<Utc>> for Param {
  fn from(ts: DateTime<Utc>) -> Self { Param::Timestamp(ts) }
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}
