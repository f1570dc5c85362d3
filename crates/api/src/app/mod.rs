//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: infrastructure wiring (stores, advisor, realtime channel)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get, routing::post};
use tower::ServiceBuilder;

use ecocrop_auth::{Hs256TokenCodec, TokenValidator};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(jwt_secret: String) -> Router {
    let tokens = Arc::new(Hs256TokenCodec::new(jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState {
        jwt: tokens.clone() as Arc<dyn TokenValidator>,
    };

    let services = Arc::new(services::build_services(tokens).await);

    // Public routes: health + credential exchange.
    let public = Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login))
        .layer(Extension(services.clone()));

    // Protected routes: require a valid bearer token.
    let protected = Router::new()
        .nest("/api", routes::router())
        .layer(Extension(services))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(ServiceBuilder::new())
}
