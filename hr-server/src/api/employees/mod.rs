//! Employee API Module

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::AppState;

/// Employee router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api/employees", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route(
            "/{id}/photo",
            get(handler::get_photo).post(handler::upload_photo),
        )
        .route(
            "/{id}/vacations",
            get(handler::list_vacations).post(handler::create_vacation),
        )
        .route("/{id}/vacations/remaining", get(handler::remaining_days))
        .route("/{id}/specialties", post(handler::set_specialties))
}
