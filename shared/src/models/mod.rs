//! Data models
//!
//! Shared between desk-server and dashboard clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! IDs are UUID strings; timestamps are `i64` Unix millis.

pub mod complaint;
pub mod staff;

// Re-exports
pub use complaint::*;
pub use staff::*;
