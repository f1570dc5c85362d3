use axum::{Router, routing::get, routing::post};

pub mod analysis;
pub mod auth;
pub mod recommend;
pub mod system;

/// Router for all authenticated endpoints (nested under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(system::stream))
        .route("/auth/me", get(auth::me))
        .route("/analysis", post(analysis::create))
        .route("/analysis/history", get(analysis::history))
        .route("/analysis/:id", get(analysis::detail))
        .route("/recommend/soil", post(recommend::by_soil))
        .route("/recommend/field", post(recommend::by_field))
}
