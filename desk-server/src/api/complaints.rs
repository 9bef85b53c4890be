//! Complaint endpoints
//!
//! `POST /complaints` and the summary are public. Edits and deletes take the
//! complaint id in the JSON body.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use shared::error::AppError;
use shared::models::{Complaint, ComplaintCreate, ComplaintUpdate, CreatedComplaint, QueueSummary};
use shared::queue::{ListQuery, Transition};

use super::{ApiResult, json_body, method_not_allowed};
use crate::auth::AuthContext;
use crate::services::complaints as service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/complaints",
            get(list)
                .post(create)
                .patch(update)
                .put(update)
                .delete(delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/complaints/summary",
            get(summary).fallback(method_not_allowed),
        )
        .route(
            "/complaints/{id}/call",
            post(call).fallback(method_not_allowed),
        )
        .route(
            "/complaints/{id}/finish",
            post(finish).fallback(method_not_allowed),
        )
}

/// Body of PATCH/PUT /complaints
#[derive(Debug, Default, Deserialize)]
pub struct ComplaintPatch {
    pub id: Option<String>,
    #[serde(flatten)]
    pub changes: ComplaintUpdate,
}

/// Body of DELETE /complaints
#[derive(Debug, Default, Deserialize)]
pub struct ComplaintId {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub message: &'static str,
    pub id: String,
}

fn require_id(id: Option<String>) -> Result<String, AppError> {
    id.map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::required_field("id"))
}

/// GET /complaints
pub async fn list(
    State(state): State<AppState>,
    ctx: AuthContext,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Complaint>> {
    Ok(Json(service::list(&state, &ctx, query).await?))
}

/// POST /complaints
pub async fn create(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<ComplaintCreate>, JsonRejection>,
) -> ApiResult<CreatedComplaint> {
    let input = json_body(payload)?;
    Ok(Json(service::create(&state, &ctx, input).await?))
}

/// PATCH|PUT /complaints
pub async fn update(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<ComplaintPatch>, JsonRejection>,
) -> ApiResult<Complaint> {
    ctx.require_staff()?;
    let patch = json_body(payload)?;
    let id = require_id(patch.id)?;
    Ok(Json(service::update(&state, &ctx, &id, patch.changes).await?))
}

/// DELETE /complaints
pub async fn delete(
    State(state): State<AppState>,
    ctx: AuthContext,
    payload: Result<Json<ComplaintId>, JsonRejection>,
) -> ApiResult<Deleted> {
    ctx.require_staff()?;
    let id = require_id(json_body(payload)?.id)?;
    service::delete(&state, &ctx, &id).await?;
    Ok(Json(Deleted {
        message: "Complaint deleted",
        id,
    }))
}

/// GET /complaints/summary
pub async fn summary(State(state): State<AppState>, ctx: AuthContext) -> ApiResult<QueueSummary> {
    Ok(Json(service::summary(&state, &ctx).await?))
}

/// POST /complaints/{id}/call
pub async fn call(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Complaint> {
    Ok(Json(service::transition(&state, &ctx, &id, Transition::Call).await?))
}

/// POST /complaints/{id}/finish
pub async fn finish(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<String>,
) -> ApiResult<Complaint> {
    Ok(Json(service::transition(&state, &ctx, &id, Transition::Finish).await?))
}
