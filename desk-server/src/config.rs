//! Front desk server configuration

use std::fmt;
use std::str::FromStr;

use chrono_tz::Tz;
use shared::queue::TicketScope;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// What a queue reset does to unfinished complaints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueueResetMode {
    /// Clear the ticket number of every unfinished complaint
    #[default]
    ClearNumbers,
    /// Delete unfinished complaints created since the start of today
    DeleteUnfinishedToday,
}

impl QueueResetMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ClearNumbers => "clear_numbers",
            Self::DeleteUnfinishedToday => "delete_unfinished_today",
        }
    }
}

impl fmt::Display for QueueResetMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueueResetMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clear_numbers" => Ok(Self::ClearNumbers),
            "delete_unfinished_today" => Ok(Self::DeleteUnfinishedToday),
            other => Err(format!(
                "invalid queue reset mode '{other}', expected clear_numbers or delete_unfinished_today"
            )),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for staff sessions
    pub jwt_secret: String,
    /// Staff token lifetime
    pub jwt_expiry_hours: i64,
    /// Which records the ticket lookup considers
    pub ticket_scope: TicketScope,
    /// Zone used for every day boundary
    pub timezone: Tz,
    pub reset_mode: QueueResetMode,
    /// Whether `GET /complaints` needs a staff session
    pub list_requires_auth: bool,
    /// Wait estimate per active ticket
    pub minutes_per_ticket: i64,
    /// Bearer secret of the maintenance hook (hook disabled when unset)
    pub cron_secret: Option<String>,
    /// Length of the maintenance window after local midnight
    pub cron_window_minutes: u32,
    /// Seed account, created when the staff table is empty
    pub admin_email: String,
    pub admin_password: String,
    pub admin_name: String,
}

impl Default for Config {
    /// Development defaults, no environment lookups
    fn default() -> Self {
        Self {
            database_url: "sqlite://desk.db?mode=rwc".into(),
            http_port: 3000,
            environment: "development".into(),
            jwt_secret: "dev-JWT_SECRET-not-for-production".into(),
            jwt_expiry_hours: 12,
            ticket_scope: TicketScope::Daily,
            timezone: chrono_tz::Asia::Jakarta,
            reset_mode: QueueResetMode::ClearNumbers,
            list_requires_auth: true,
            minutes_per_ticket: 7,
            cron_secret: None,
            cron_window_minutes: 5,
            admin_email: "admin@localhost".into(),
            admin_password: "dev-ADMIN_PASSWORD-not-for-production".into(),
            admin_name: "Administrator".into(),
        }
    }
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Parse an optional env var, falling back to `default` when unset
    fn parse_var<T>(name: &str, default: T) -> Result<T, BoxError>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match std::env::var(name) {
            Ok(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse()
                .map_err(|e| format!("{name}: {e}").into()),
            _ => Ok(default),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let defaults = Self::default();
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let timezone = match std::env::var("BUSINESS_TIMEZONE") {
            Ok(name) if !name.trim().is_empty() => shared::util::parse_timezone(&name)?,
            _ => defaults.timezone,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            http_port: Self::parse_var("HTTP_PORT", defaults.http_port)?,
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: Self::parse_var("JWT_EXPIRY_HOURS", defaults.jwt_expiry_hours)?,
            ticket_scope: Self::parse_var("TICKET_SCOPE", defaults.ticket_scope)?,
            timezone,
            reset_mode: Self::parse_var("QUEUE_RESET_MODE", defaults.reset_mode)?,
            list_requires_auth: Self::parse_var("LIST_REQUIRES_AUTH", defaults.list_requires_auth)?,
            minutes_per_ticket: Self::parse_var("MINUTES_PER_TICKET", defaults.minutes_per_ticket)?,
            cron_secret: std::env::var("CRON_SECRET").ok().filter(|s| !s.is_empty()),
            cron_window_minutes: Self::parse_var(
                "CRON_WINDOW_MINUTES",
                defaults.cron_window_minutes,
            )?,
            admin_email: std::env::var("ADMIN_EMAIL")
                .map(|e| e.trim().to_lowercase())
                .unwrap_or(defaults.admin_email),
            admin_password: Self::require_secret("ADMIN_PASSWORD", &environment)?,
            admin_name: std::env::var("ADMIN_NAME").unwrap_or(defaults.admin_name),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
