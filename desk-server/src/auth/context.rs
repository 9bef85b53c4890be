//! Caller identity passed explicitly into every service call

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::{AppError, ErrorCode};

use crate::auth::{JwtError, JwtService};
use crate::security_log;
use crate::state::AppState;

/// Who is calling
///
/// Built from the `Authorization` header. Extraction never fails: a missing
/// or unusable token yields an anonymous context, so public routes keep
/// working for a desk whose session went stale. A rejected token is kept in
/// `token_error` and reported by [`AuthContext::require_staff`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub authenticated: bool,
    pub staff_id: Option<String>,
    /// Why a presented token was refused
    pub token_error: Option<ErrorCode>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn staff(staff_id: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            staff_id: Some(staff_id.into()),
            token_error: None,
        }
    }

    /// Anonymous context remembering a refused token
    pub fn rejected(code: ErrorCode) -> Self {
        Self {
            token_error: Some(code),
            ..Self::default()
        }
    }

    /// Staff id of an authenticated caller
    ///
    /// 401 otherwise: `TokenExpired`/`TokenInvalid` when a token was refused,
    /// `NotAuthenticated` when none was sent.
    pub fn require_staff(&self) -> Result<&str, AppError> {
        match (self.authenticated, self.staff_id.as_deref(), self.token_error) {
            (true, Some(id), None) => Ok(id),
            (_, _, Some(code)) => Err(AppError::new(code)),
            _ => Err(AppError::not_authenticated()),
        }
    }

    /// Resolve the context from an `Authorization` header value
    pub fn from_header(jwt: &JwtService, header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::anonymous();
        };

        let Some(token) = JwtService::extract_from_header(header) else {
            security_log!("WARN", "auth_header_malformed");
            return Self::rejected(ErrorCode::TokenInvalid);
        };

        match jwt.validate_token(token) {
            Ok(claims) => Self::staff(claims.sub),
            Err(e) => {
                security_log!("WARN", "auth_failed", error = e);
                match e {
                    JwtError::ExpiredToken => Self::rejected(ErrorCode::TokenExpired),
                    _ => Self::rejected(ErrorCode::TokenInvalid),
                }
            }
        }
    }
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(ctx.clone());
        }

        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let ctx = Self::from_header(&state.jwt, header);
        if ctx.token_error.is_some() {
            tracing::debug!(uri = %parts.uri, "Continuing as anonymous after a refused token");
        }

        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
