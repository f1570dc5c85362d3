use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use ecocrop_auth::{PasswordHash, validate_password_policy};
use ecocrop_core::{Email, UserId};
use ecocrop_store::UserRecord;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// Uniform credential failure: never reveals whether the email exists.
const BAD_CREDENTIALS: &str = "invalid email or password";

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let email = match Email::parse(&body.email) {
        Ok(e) => e,
        Err(e) => return errors::domain_error_to_response(e),
    };
    if let Err(e) = validate_password_policy(&body.password) {
        return errors::domain_error_to_response(e);
    }
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", "name must not be empty");
    }

    // Hash derivation is CPU-heavy; keep it off the request executor.
    let password = body.password;
    let hash = match tokio::task::spawn_blocking(move || PasswordHash::derive(&password)).await {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("password hashing task failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "registration failed",
            );
        }
    };

    let user = UserRecord {
        id: UserId::new(),
        email,
        name,
        password_hash: hash.encode(),
        created_at: Utc::now(),
    };

    if let Err(e) = services.users().insert(user.clone()).await {
        return errors::store_error_to_response(e);
    }

    let token = match services.tokens().issue(user.id, &user.email, Utc::now()) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("token issue failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "registration failed",
            );
        }
    };

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "token": token,
            "user": dto::user_to_json(&user),
        })),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    // An address that can't parse can't be registered either; same answer.
    let Ok(email) = Email::parse(&body.email) else {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", BAD_CREDENTIALS);
    };

    let user = match services.users().find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", BAD_CREDENTIALS);
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    let hash = match PasswordHash::parse(&user.password_hash) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(user_id = %user.id, "stored password hash unreadable: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "login failed",
            );
        }
    };

    let password = body.password;
    let verified = match tokio::task::spawn_blocking(move || hash.verify(&password)).await {
        Ok(v) => v,
        Err(e) => {
            tracing::error!("password verify task failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "login failed",
            );
        }
    };
    if !verified {
        return errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", BAD_CREDENTIALS);
    }

    let token = match services.tokens().issue(user.id, &user.email, Utc::now()) {
        Ok(t) => t,
        Err(e) => {
            tracing::error!("token issue failed: {e}");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "login failed",
            );
        }
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "token": token,
            "user": dto::user_to_json(&user),
        })),
    )
        .into_response()
}

pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.users().find_by_id(principal.user_id()).await {
        Ok(Some(user)) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        // Token outlived the account.
        Ok(None) => errors::json_error(StatusCode::UNAUTHORIZED, "unauthorized", "user not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
