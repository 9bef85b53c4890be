//! Staff administration: queue resets and profile

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use shared::models::{PasswordConfirm, ProfileUpdate, StaffProfile};

use super::{ApiResult, json_body, method_not_allowed};
use crate::auth::AuthContext;
use crate::services;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/reset-queue",
            post(reset_queue).fallback(method_not_allowed),
        )
        .route(
            "/admin/reset-database",
            post(reset_database).fallback(method_not_allowed),
        )
        .route(
            "/admin/profile",
            get(get_profile).put(update_profile).fallback(method_not_allowed),
        )
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub message: &'static str,
    pub count: u64,
}

/// POST /admin/reset-queue
pub async fn reset_queue(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> ApiResult<ResetResponse> {
    let count = services::complaints::reset_queue(&state, &ctx).await?;
    Ok(Json(ResetResponse {
        message: "Queue reset successfully.",
        count,
    }))
}

/// POST /admin/reset-database
pub async fn reset_database(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<PasswordConfirm>, JsonRejection>,
) -> ApiResult<ResetResponse> {
    ctx.require_staff()?;
    let req = json_body(payload)?;
    let count = services::complaints::reset_all(&state, &ctx, req.password.as_deref()).await?;
    Ok(Json(ResetResponse {
        message: "All complaints deleted.",
        count,
    }))
}

/// GET /admin/profile
pub async fn get_profile(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> ApiResult<StaffProfile> {
    Ok(Json(services::staff::profile(&state, &ctx).await?))
}

/// PUT /admin/profile
pub async fn update_profile(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<ProfileUpdate>, JsonRejection>,
) -> ApiResult<StaffProfile> {
    ctx.require_staff()?;
    let update = json_body(payload)?;
    Ok(Json(services::staff::update_profile(&state, &ctx, update).await?))
}
