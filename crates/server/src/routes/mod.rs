//! Route definitions for the registry service.

pub mod insureds;

use axum::{Router, routing::get};

use crate::state::AppState;

/// All registry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/insureds", get(insureds::list).post(insureds::create))
        .route(
            "/api/insureds/{id}",
            get(insureds::show)
                .put(insureds::update)
                .delete(insureds::remove),
        )
        .route("/api/insureds/search/{fragment}", get(insureds::search))
}
