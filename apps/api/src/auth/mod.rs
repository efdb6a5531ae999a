// Session guard: every question-set operation needs a resolved identity.
// Tokens are issued by the register/login handlers and checked here.

pub mod handlers;
pub mod password;
pub mod session;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::session::SessionError;
use crate::errors::AppError;
use crate::state::AppState;

/// The authenticated caller. Taking it as a handler argument rejects the
/// request with 401 before the handler body runs.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = bearer_token(&parts.headers).ok_or(SessionError::Missing)?;
        let claims = state.sessions.verify(token)?;
        Ok(AuthUser {
            user_id: claims.user_id()?,
            email: claims.email,
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
