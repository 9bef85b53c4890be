//! desk-server - front-desk complaint queue
//!
//! Walk-in customers register a complaint and get a ticket (`A001`, `A002`, ...).
//! Staff sign in to call, finish, edit and delete tickets, and to reset the
//! queue at the end of the day.
//!
//! ```text
//! desk-server/src/
//! ├── api/        # axum routers and handlers
//! ├── auth/       # JWT, request context, rate limiting, cron secret
//! ├── services/   # complaint, staff and maintenance operations
//! ├── db/         # SQLite queries (sqlx)
//! ├── config.rs   # environment configuration
//! ├── error.rs    # service-layer error
//! └── state.rs    # shared application state
//! ```

// Security logging macro, `%`-formats every value
#[macro_export]
macro_rules! security_log {
    ("WARN", $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::warn!(
            target: "security",
            level = "WARN",
            event = $event
            $(, $key = %$value)*
        );
    };
    ("ERROR", $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::error!(
            target: "security",
            level = "ERROR",
            event = $event
            $(, $key = %$value)*
        );
    };
    ($level:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event
            $(, $key = %$value)*
        );
    };
}

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;
pub mod util;

pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
