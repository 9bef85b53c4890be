//! Nightly maintenance triggered by the external scheduler

use serde::Serialize;
use shared::util::start_of_days_ago_millis;

use crate::auth::cron::MaintenanceWindow;
use crate::db;
use crate::error::ServiceResult;
use crate::services::complaints::run_daily_reset;
use crate::state::AppState;

/// Outcome of one hook invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MaintenanceOutcome {
    #[serde(rename_all = "camelCase")]
    Reset {
        reset_count: u64,
        /// Complaints created before yesterday, kept but reported
        old_complaints_count: i64,
    },
    /// A reset already ran today; scheduler retries land here
    #[serde(rename_all = "camelCase")]
    AlreadyReset { last_reset_at: i64 },
    #[serde(rename_all = "camelCase")]
    OutsideWindow { current_hour: u32, current_minute: u32 },
}

impl MaintenanceOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Reset { .. } => "Queue reset completed",
            Self::AlreadyReset { .. } => "Queue already reset today",
            Self::OutsideWindow { .. } => "Not midnight, no reset needed",
        }
    }
}

/// Reset the queue when `now` falls inside the maintenance window
///
/// Idempotent per business day.
pub async fn run(state: &AppState, now: i64) -> ServiceResult<MaintenanceOutcome> {
    let tz = state.config.timezone;
    let window = MaintenanceWindow::new(state.config.cron_window_minutes);

    if !window.contains(now, tz) {
        let (current_hour, current_minute) = MaintenanceWindow::local_clock(now, tz);
        tracing::debug!(current_hour, current_minute, "Maintenance hook outside its window");
        return Ok(MaintenanceOutcome::OutsideWindow {
            current_hour,
            current_minute,
        });
    }

    let Some(reset_count) = run_daily_reset(state, now).await? else {
        let last_reset_at = db::queue_state::get(&state.pool)
            .await?
            .last_reset_at
            .unwrap_or_default();
        tracing::info!(last_reset_at, "Queue already reset today, skipping");
        return Ok(MaintenanceOutcome::AlreadyReset { last_reset_at });
    };

    let old_before = start_of_days_ago_millis(now, 1, tz);
    let old_complaints_count = db::complaints::count_created_before(&state.pool, old_before).await?;
    if old_complaints_count > 0 {
        tracing::info!(old_complaints_count, "Complaints older than yesterday kept for archival");
    }
    tracing::info!(reset_count, mode = %state.config.reset_mode, "Nightly queue reset completed");

    Ok(MaintenanceOutcome::Reset {
        reset_count,
        old_complaints_count,
    })
}
