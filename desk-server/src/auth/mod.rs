//! Staff sessions, rate limiting and the maintenance hook secret

pub mod context;
pub mod cron;
pub mod jwt;
pub mod rate_limit;

pub use context::AuthContext;
pub use jwt::{Claims, JwtError, JwtService};
pub use rate_limit::RateLimiter;
