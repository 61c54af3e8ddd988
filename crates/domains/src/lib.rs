//! domains
//!
//! Entities, value types, errors and port traits for the threaded
//! discussion engine. No I/O lives here.

pub mod errors;
pub mod models;
pub mod paging;
pub mod path;
pub mod ports;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use paging::*;
pub use path::*;
pub use ports::*;
