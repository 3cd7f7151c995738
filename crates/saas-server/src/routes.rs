//! Router

use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::cors::cors_headers;
use crate::handlers::{create_checkout_session, health_check, preflight, verify_checkout};
use crate::state::AppState;

pub const CREATE_CHECKOUT_PATH: &str = "/functions/v1/create-checkout-session";
pub const VERIFY_CHECKOUT_PATH: &str = "/functions/v1/verify-checkout";

/// Build the application router
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(CREATE_CHECKOUT_PATH, post(create_checkout_session).options(preflight))
        .route(VERIFY_CHECKOUT_PATH, post(verify_checkout).options(preflight))
        // Login and dashboard pages; unknown paths get the app shell
        .fallback_service(
            ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html"))),
        )
        .layer(middleware::from_fn(cors_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
