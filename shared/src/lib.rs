//! Shared types for the front desk queue service
//!
//! Domain model, queue rules, CSV export and the unified error system,
//! used by desk-server and by dashboard clients.

pub mod error;
pub mod export;
pub mod models;
pub mod queue;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use models::{Complaint, ComplaintStatus};
