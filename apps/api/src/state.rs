use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::session::SessionKeys;
use crate::llm_client::LlmClient;
use crate::questions::store::QuestionSetStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Used directly by the credential handlers.
    pub db: PgPool,
    /// Question set persistence. Default: `PgQuestionSetStore` over `db`.
    pub sets: Arc<dyn QuestionSetStore>,
    pub llm: LlmClient,
    pub sessions: SessionKeys,
}
