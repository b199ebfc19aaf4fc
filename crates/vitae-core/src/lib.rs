//! Core types and trait definitions for the vitae résumé store.
//!
//! This crate is deliberately free of database and runtime dependencies.
//! Storage backends and the service layer depend on it; it depends on
//! nothing heavier than `chrono` and `serde`.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod resume;
pub mod store;

pub use resume::{Education, Experience, NewResume, Project, Resume, ResumeId};
pub use store::ResumeStore;
