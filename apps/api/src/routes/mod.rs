pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::questions::handlers as questions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Credentials
        .route("/api/v1/auth/register", post(auth::handle_register))
        .route("/api/v1/auth/login", post(auth::handle_login))
        .route("/api/v1/auth/me", get(auth::handle_me))
        // Question sets
        .route("/api/v1/generate", post(questions::handle_generate))
        .route(
            "/api/v1/sets",
            get(questions::handle_list_sets).post(questions::handle_create_set),
        )
        .route("/api/v1/sets/:id", get(questions::handle_get_set))
        .route("/api/v1/sets/:id/export", get(questions::handle_export_set))
        .with_state(state)
}
