//! Application state for desk-server

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::auth::{JwtService, RateLimiter};
use crate::config::Config;
use crate::db;
use crate::services;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// SQLite connection pool
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    /// Staff session tokens
    pub jwt: JwtService,
    /// Rate limiter for the login route
    pub rate_limiter: RateLimiter,
    /// Serializes ticket lookup + insert
    pub ticket_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Open the configured database and build the state
    pub async fn new(config: Config) -> Result<Self, BoxError> {
        let pool = db::connect(&config.database_url).await?;
        Self::with_pool(pool, config).await
    }

    /// Build the state around an already migrated pool
    ///
    /// Seeds the first staff account when none exists.
    pub async fn with_pool(pool: SqlitePool, config: Config) -> Result<Self, BoxError> {
        services::staff::seed_admin(&pool, &config).await?;

        Ok(Self {
            jwt: JwtService::new(&config.jwt_secret, config.jwt_expiry_hours),
            pool,
            config: Arc::new(config),
            rate_limiter: RateLimiter::new(),
            ticket_lock: Arc::new(Mutex::new(())),
        })
    }
}
