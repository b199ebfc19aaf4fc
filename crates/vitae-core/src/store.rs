//! The `ResumeStore` trait.
//!
//! Implemented by storage backends (e.g. `vitae-store-sqlite`). The service
//! layer depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::resume::{NewResume, Resume, ResumeId};

/// Abstraction over a résumé store backend.
///
/// `save` and `update` each run as a single transaction: either every row of
/// the aggregate lands, or none do. Updates replace the child collections
/// wholesale — the on-disk state after a successful `update` equals the
/// in-memory collections at commit time, with no leftover rows.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait ResumeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new résumé. The store assigns the id and both timestamps and
  /// returns the stamped aggregate. The id is only valid once this resolves
  /// without error.
  fn save(
    &self,
    resume: NewResume,
  ) -> impl Future<Output = Result<Resume, Self::Error>> + Send + '_;

  /// Re-persist an already-saved résumé under its existing id, bumping
  /// `updated_at`. Fails with not-found semantics if the root row is gone.
  fn update(
    &self,
    resume: Resume,
  ) -> impl Future<Output = Result<Resume, Self::Error>> + Send + '_;

  /// Remove a résumé and, via cascade, all of its child rows. Idempotent:
  /// deleting an id that does not exist is not an error.
  fn delete(
    &self,
    id: ResumeId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Fetch one résumé with its full child set. `None` when absent.
  fn find_by_id(
    &self,
    id: ResumeId,
  ) -> impl Future<Output = Result<Option<Resume>, Self::Error>> + Send + '_;

  /// All résumés, most recently created first, fully hydrated.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Resume>, Self::Error>> + Send + '_;

  /// Résumés whose full name contains `needle`, using the backend's default
  /// text-matching semantics. Same ordering and hydration as [`find_all`].
  ///
  /// [`find_all`]: ResumeStore::find_all
  fn search_by_name<'a>(
    &'a self,
    needle: &'a str,
  ) -> impl Future<Output = Result<Vec<Resume>, Self::Error>> + Send + 'a;
}
