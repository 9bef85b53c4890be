//! Staff login

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::{Json, Router, middleware, routing::post};
use shared::models::{LoginRequest, LoginResponse};

use super::{ApiResult, json_body, method_not_allowed};
use crate::auth::rate_limit::login_rate_limit;
use crate::services;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login).fallback(method_not_allowed))
        .route_layer(middleware::from_fn_with_state(state.clone(), login_rate_limit))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let req = json_body(payload)?;
    let response =
        services::staff::login(&state, req.email.as_deref(), req.password.as_deref()).await?;
    Ok(Json(response))
}
