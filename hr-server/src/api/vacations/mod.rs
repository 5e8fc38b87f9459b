//! Vacation API Module

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::AppState;

/// Vacation router (creation is employee-scoped, under /api/employees)
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/vacations", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/{action}", post(handler::decide))
}
