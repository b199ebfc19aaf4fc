//! Service layer for the vitae résumé store.
//!
//! This is the surface a UI layer consumes: the [`Gateway`] dispatches
//! store operations onto a fixed-size worker pool and hands back awaitable
//! [`OpHandle`]s, while the [`ViewHandle`] mirrors the store's contents for
//! rendering. The gateway is generic over any
//! [`ResumeStore`](vitae_core::ResumeStore) backend.

pub mod config;
pub mod error;
pub mod gateway;
pub mod view;

pub use config::ServiceConfig;
pub use error::Error;
pub use gateway::{Gateway, OpHandle};
pub use view::{ViewHandle, ViewOp};

/// Initialise tracing for the embedding application. Call once at startup;
/// the filter honours `RUST_LOG` and defaults to `info`.
pub fn init_tracing() {
  use tracing::level_filters::LevelFilter;
  use tracing_subscriber::EnvFilter;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();
}
