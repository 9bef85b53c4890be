//! HTTP API for desk-server
//!
//! Successful responses are the payload itself; failures use the
//! [`ApiResponse`](shared::ApiResponse) error body.

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod cron;
pub mod health;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use http::{HeaderName, HeaderValue};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, AppError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID generator (UUID v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&crate::util::new_id())
            .ok()
            .map(RequestId::new)
    }
}

/// JSON body or a 400 with the unified error body
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::invalid_request(rejection.body_text()))
}

/// JSON 405 for known paths hit with an unsupported method
pub(crate) async fn method_not_allowed() -> AppError {
    AppError::method_not_allowed()
}

async fn not_found() -> AppError {
    AppError::not_found("Route")
}

/// All routes, state not yet attached
pub fn build_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router(state))
        .merge(complaints::router())
        .merge(admin::router())
        .merge(cron::router())
        .fallback(not_found)
}

/// Fully configured application with middleware and state
pub fn build_app(state: AppState) -> Router {
    build_router(&state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}
