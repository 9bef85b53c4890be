//! Maintenance hook for the external scheduler

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use http::HeaderMap;
use serde::Serialize;
use shared::util::now_millis;

use super::{ApiResult, method_not_allowed};
use crate::auth::cron::verify_cron_secret;
use crate::services::maintenance::{self, MaintenanceOutcome};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/cron/reset-queue",
        post(reset_queue).fallback(method_not_allowed),
    )
}

#[derive(Debug, Serialize)]
pub struct CronResponse {
    pub message: &'static str,
    /// RFC 3339, UTC
    pub timestamp: String,
    #[serde(flatten)]
    pub outcome: MaintenanceOutcome,
}

/// POST /cron/reset-queue
pub async fn reset_queue(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<CronResponse> {
    verify_cron_secret(&headers, state.config.cron_secret.as_deref())?;

    let now = now_millis();
    let outcome = maintenance::run(&state, now).await?;

    Ok(Json(CronResponse {
        message: outcome.message(),
        timestamp: shared::util::local_datetime(now, chrono_tz::UTC).to_rfc3339(),
        outcome,
    }))
}
