pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/skills/extract",
            post(handlers::handle_extract_skills),
        )
        .route(
            "/api/v1/experience/extract",
            post(handlers::handle_extract_experience),
        )
        .route("/api/v1/match", post(handlers::handle_match))
        .route("/api/v1/match/batch", post(handlers::handle_match_batch))
        .route(
            "/api/v1/match/upload",
            post(handlers::handle_match_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/roles", get(handlers::handle_list_roles))
        .route("/api/v1/roles/gap", post(handlers::handle_role_gap))
        .route(
            "/api/v1/roles/gap/upload",
            post(handlers::handle_role_gap_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(state)
}
