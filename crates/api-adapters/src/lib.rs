//! # api-adapters
//!
//! HTTP delivery for the discussion engine. Request bodies and query
//! strings are decoded into service inputs in [`dto`]; the axum router,
//! error mapping and metrics middleware live in `web`, behind the
//! `web-axum` feature.

pub mod dto;
pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod web;

pub use metrics::HttpMetrics;
#[cfg(feature = "web-axum")]
pub use web::{router, AppState};
