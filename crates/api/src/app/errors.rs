use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ecocrop_advisor::AdvisorError;
use ecocrop_core::DomainError;
use ecocrop_store::StoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => {
            json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized")
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Backend(msg) => {
            tracing::error!("store backend error: {msg}");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "storage backend error",
            )
        }
    }
}

pub fn advisor_error_to_response(err: AdvisorError) -> axum::response::Response {
    match err {
        AdvisorError::InvalidInput(e) => domain_error_to_response(e),
        AdvisorError::Upstream(msg) => {
            tracing::error!("advisor upstream error: {msg}");
            json_error(StatusCode::BAD_GATEWAY, "advisor_unavailable", "advisor unavailable")
        }
        AdvisorError::MalformedAnswer(msg) => {
            tracing::error!("advisor returned malformed answer: {msg}");
            json_error(StatusCode::BAD_GATEWAY, "advisor_error", "advisor answer unusable")
        }
    }
}
