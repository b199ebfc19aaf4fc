//! Error type for `vitae-store-sqlite`.

use thiserror::Error;
use vitae_core::ResumeId;

#[derive(Debug, Error)]
pub enum Error {
  /// The connection could not be established or has already closed.
  #[error("storage unavailable: {0}")]
  Unavailable(String),

  /// A statement failed — malformed SQL or a constraint violation.
  #[error("statement failed: {0}")]
  Statement(#[from] rusqlite::Error),

  /// An insert succeeded but the backend returned no generated row id.
  #[error("insert returned no generated key")]
  NoGeneratedKey,

  /// Logical absence: the root row for an update was gone.
  #[error("résumé not found: {0}")]
  NotFound(ResumeId),

  /// A statement failed mid-transaction; the transaction was rolled back.
  #[error("{op} transaction aborted: {source}")]
  TransactionAborted {
    op:     &'static str,
    #[source]
    source: Box<Error>,
  },

  #[error("timestamp parse error: {0}")]
  DateParse(String),
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::ConnectionClosed => {
        Error::Unavailable("connection closed".into())
      }
      tokio_rusqlite::Error::Close((_, e)) => Error::Unavailable(e.to_string()),
      tokio_rusqlite::Error::Rusqlite(e) => Error::Statement(e),
      // `Database::with_tx` smuggles our own error through `Other`.
      tokio_rusqlite::Error::Other(e) => match e.downcast::<Error>() {
        Ok(e) => *e,
        Err(e) => Error::Unavailable(e.to_string()),
      },
      // The enum is non-exhaustive upstream.
      e => Error::Unavailable(e.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
