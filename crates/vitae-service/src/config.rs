//! Runtime configuration for the service layer.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Settings the embedding application provides (or defaults).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
  /// Path of the SQLite database file.
  pub store_path: PathBuf,

  /// Fixed worker-pool size. Call overflow queues rather than growing the
  /// pool.
  pub workers: usize,

  /// How long [`Gateway::shutdown`](crate::Gateway::shutdown) waits for
  /// in-flight work before cancelling stragglers.
  pub shutdown_timeout_secs: u64,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      store_path:            PathBuf::from("vitae.db"),
      workers:               5,
      shutdown_timeout_secs: 5,
    }
  }
}

impl ServiceConfig {
  /// Load configuration from an optional TOML file, layered with
  /// `VITAE_`-prefixed environment variables. Missing keys fall back to
  /// the defaults above.
  pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
      builder =
        builder.add_source(config::File::from(path.to_path_buf()).required(false));
    }
    builder
      .add_source(config::Environment::with_prefix("VITAE"))
      .build()?
      .try_deserialize()
  }
}
