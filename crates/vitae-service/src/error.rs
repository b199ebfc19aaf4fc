//! Error type for `vitae-service`.

use thiserror::Error;

/// How an async operation can fail from the caller's point of view.
///
/// `E` is the store backend's error type; store failures pass through
/// unmodified so the caller can match on them.
#[derive(Debug, Error)]
pub enum Error<E>
where
  E: std::error::Error + Send + Sync + 'static,
{
  /// The store operation itself failed. The gateway performs no retry;
  /// that decision belongs to the caller.
  #[error("store operation failed: {0}")]
  Store(#[source] E),

  /// The operation was cancelled before it produced a result — its worker
  /// was stopped during shutdown.
  #[error("operation cancelled before completion")]
  Cancelled,

  /// The gateway is no longer accepting work.
  #[error("gateway is shut down")]
  Shutdown,
}
