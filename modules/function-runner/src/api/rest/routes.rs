//! Route registration for the function runner page

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::module::FunctionRunner;

use super::handlers;

/// Register the page routes.
///
/// * `GET /` - the page with both cards
/// * `POST /ticket`, `POST /sum` - submit a card's form
/// * `GET /health` - liveness probe
#[must_use]
pub fn register_routes(router: Router, runner: Arc<FunctionRunner>) -> Router {
    router
        .route("/", get(handlers::page))
        .route("/ticket", post(handlers::submit_ticket))
        .route("/sum", post(handlers::submit_sum))
        .route("/health", get(handlers::health))
        .layer(Extension(runner))
}
