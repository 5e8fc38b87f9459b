//! Document API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::AppState;

/// Document router: uploads are employee-scoped, the rest addresses the
/// attachment directly.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/employees/{id}/documents",
            get(handler::list).post(handler::upload),
        )
        .route(
            "/api/documents/{id}",
            get(handler::get_by_id).delete(handler::delete),
        )
        .route("/api/documents/{id}/file", get(handler::download))
}
