//! # storage-adapters
//!
//! Storage primitives implementing the `domains` ports. Each backend sits
//! behind a cargo feature so deployments compile only what they use.

#[cfg(feature = "db-sqlite")]
pub mod sqlite;

#[cfg(feature = "db-sqlite")]
pub use sqlite::{SqliteStore, StoreError, StoreSettings};
