//! Specialty API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::core::AppState;

/// Specialty router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/specialties", routes())
}

fn routes() -> Router<AppState> {
    // Read routes: any authenticated user (filter dropdowns, profile forms)
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/all", get(handler::list_with_inactive))
        .route("/{id}", get(handler::get_by_id));

    // Manage routes: administrators only
    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route(
            "/{id}",
            axum::routing::put(handler::update).delete(handler::delete),
        )
        .layer(middleware::from_fn(require_admin));

    read_routes.merge(manage_routes)
}
