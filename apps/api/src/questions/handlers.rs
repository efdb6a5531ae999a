//! Axum route handlers for generation and saved question sets.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::{AppError, AppJson};
use crate::questions::export::{export_csv, export_filename};
use crate::questions::generator::generate_questions;
use crate::questions::models::{
    Difficulty, GeneratedQuestion, QuestionInput, QuestionSetDetail, QuestionSetRow,
};
use crate::questions::store::validate_new_set;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub role: Option<String>,
    pub difficulty: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub sets: Vec<QuestionSetRow>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSetRequest {
    pub role: Option<String>,
    pub difficulty: Option<String>,
    pub questions: Option<Vec<QuestionInput>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSetResponse {
    pub message: String,
    pub set_id: Uuid,
}

/// Unparsable ids cannot name an existing set, so they get the same 404.
fn parse_set_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| not_found())
}

fn not_found() -> AppError {
    AppError::NotFound("Question set not found".to_string())
}

async fn load_owned_set(
    state: &AppState,
    user: &AuthUser,
    raw_id: &str,
) -> Result<QuestionSetDetail, AppError> {
    let set_id = parse_set_id(raw_id)?;
    state
        .sets
        .get(user.user_id, set_id)
        .await?
        .ok_or_else(not_found)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/generate
///
/// Generates ten questions without saving them.
pub async fn handle_generate(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let role = req.role.unwrap_or_default();
    let difficulty = req.difficulty.unwrap_or_default();
    if role.trim().is_empty() || difficulty.is_empty() {
        return Err(AppError::Validation(
            "Role and difficulty are required".to_string(),
        ));
    }
    let difficulty: Difficulty = difficulty.parse().map_err(|_| {
        AppError::Validation("Difficulty must be Junior, Mid, or Senior".to_string())
    })?;

    info!("User {} requested generation", user.user_id);
    let questions = generate_questions(&state.llm, &role, difficulty).await?;

    Ok(Json(GenerateResponse { questions }))
}

/// GET /api/v1/sets?search=
pub async fn handle_list_sets(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let sets = state
        .sets
        .list(user.user_id, query.search.as_deref())
        .await?;
    Ok(Json(ListResponse { sets }))
}

/// POST /api/v1/sets
pub async fn handle_create_set(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<CreateSetRequest>,
) -> Result<(StatusCode, Json<CreateSetResponse>), AppError> {
    let new_set = validate_new_set(req.role, req.difficulty, req.questions)?;
    let set_id = state.sets.create(user.user_id, new_set).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateSetResponse {
            message: "Question set saved successfully".to_string(),
            set_id,
        }),
    ))
}

/// GET /api/v1/sets/:id
pub async fn handle_get_set(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<QuestionSetDetail>, AppError> {
    Ok(Json(load_owned_set(&state, &user, &id).await?))
}

/// GET /api/v1/sets/:id/export
///
/// Ownership is resolved before any CSV bytes are produced.
pub async fn handle_export_set(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = load_owned_set(&state, &user, &id).await?;
    let body = export_csv(&detail)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", export_filename(detail.set.id)),
        ),
    ];
    Ok((headers, body))
}
