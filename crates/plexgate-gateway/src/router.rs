//! Axum router wiring.
//!
//! `/` is the bridge endpoint, `/server` the discovery responder, the rest
//! are operational endpoints. Every response carries the CORS headers.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            post(transport::http::bridge_endpoint).options(transport::http::preflight),
        )
        .route("/server", get(transport::http::server_discovery))
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .layer(middleware::from_fn(transport::cors::enforce_headers))
        .with_state(state)
}
