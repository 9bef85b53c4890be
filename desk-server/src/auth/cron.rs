//! Shared-secret check and time window of the maintenance hook

use chrono::Timelike;
use chrono_tz::Tz;
use http::HeaderMap;
use shared::error::AppError;

use crate::auth::JwtService;
use crate::security_log;

/// Verify `Authorization: Bearer <CRON_SECRET>`
///
/// Fails when no secret is configured, so the hook stays closed by default.
pub fn verify_cron_secret(headers: &HeaderMap, configured: Option<&str>) -> Result<(), AppError> {
    let provided = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header);

    match (configured, provided) {
        (Some(expected), Some(given)) if constant_time_eq(expected.as_bytes(), given.as_bytes()) => {
            Ok(())
        }
        (None, _) => {
            security_log!("WARN", "cron_disabled");
            Err(AppError::not_authenticated())
        }
        _ => {
            security_log!("WARN", "cron_secret_rejected");
            Err(AppError::not_authenticated())
        }
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Minutes after local midnight during which the hook resets the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceWindow {
    pub minutes: u32,
}

impl MaintenanceWindow {
    pub fn new(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Local `(hour, minute)` of `now` in the business zone
    pub fn local_clock(now: i64, tz: Tz) -> (u32, u32) {
        let local = shared::util::local_datetime(now, tz);
        (local.hour(), local.minute())
    }

    pub fn contains(&self, now: i64, tz: Tz) -> bool {
        let (hour, minute) = Self::local_clock(now, tz);
        hour * 60 + minute < self.minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TZ: Tz = chrono_tz::Asia::Jakarta;

    fn at(h: u32, m: u32) -> i64 {
        TZ.with_ymd_and_hms(2024, 5, 1, h, m, 30)
            .single()
            .unwrap()
            .timestamp_millis()
    }

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_window_bounds() {
        let window = MaintenanceWindow::new(5);
        assert!(window.contains(at(0, 0), TZ));
        assert!(window.contains(at(0, 4), TZ));
        assert!(!window.contains(at(0, 5), TZ));
        assert!(!window.contains(at(12, 0), TZ));
        assert!(!window.contains(at(23, 59), TZ));
    }

    #[test]
    fn test_window_uses_business_zone() {
        // 00:02 in Jakarta is 17:02 UTC the day before
        let now = at(0, 2);
        assert_eq!(MaintenanceWindow::local_clock(now, TZ), (0, 2));
        assert!(!MaintenanceWindow::new(5).contains(now, chrono_tz::UTC));
    }

    #[test]
    fn test_secret_check() {
        assert!(verify_cron_secret(&bearer("Bearer s3cret"), Some("s3cret")).is_ok());
        assert!(verify_cron_secret(&bearer("Bearer wrong"), Some("s3cret")).is_err());
        assert!(verify_cron_secret(&HeaderMap::new(), Some("s3cret")).is_err());
        assert!(verify_cron_secret(&bearer("Bearer s3cret"), None).is_err());
    }
}
