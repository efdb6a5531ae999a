//! Axum route handlers for credentials: registration, login, identity.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{hash_password, verify_password, DUMMY_HASH};
use crate::auth::AuthUser;
use crate::errors::{AppError, AppJson};
use crate::models::user::{User, UserResponse};
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 8;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

struct Credentials {
    email: String,
    password: String,
}

fn read_credentials(req: CredentialsRequest) -> Result<Credentials, AppError> {
    let email = req.email.map(|e| e.trim().to_lowercase()).unwrap_or_default();
    let password = req.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(Credentials { email, password })
}

fn issue_response(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let token = state
        .sessions
        .issue(user.id, &user.email)
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(AuthResponse {
        user: user.into(),
        token,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Credentials { email, password } = read_credentials(req)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    // Argon2 is CPU-bound; run it on the blocking pool.
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, password_hash, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict("An account with this email already exists".to_string())
        }
        other => AppError::Database(other),
    })?;

    info!("Registered user {}", user.id);
    Ok((StatusCode::CREATED, Json(issue_response(&state, user)?)))
}

/// POST /api/v1/auth/login
///
/// Unknown email and wrong password produce the same 401.
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(req): AppJson<CredentialsRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let Credentials { email, password } = read_credentials(req)?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(&state.db)
    .await?;

    // Unknown emails still pay for one verification.
    let stored_hash = user
        .as_ref()
        .map_or_else(|| DUMMY_HASH.to_string(), |u| u.password_hash.clone());
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    let user = match user {
        Some(user) if valid => user,
        _ => return Err(AppError::Unauthorized),
    };

    info!("User {} logged in", user.id);
    Ok(Json(issue_response(&state, user)?))
}

/// GET /api/v1/auth/me
pub async fn handle_me(user: AuthUser) -> Json<AuthUser> {
    Json(user)
}
