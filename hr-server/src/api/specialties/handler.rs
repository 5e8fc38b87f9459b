//! Specialty API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::AppState;
use crate::db::repository::specialty;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{Specialty, SpecialtyCreate, SpecialtyUpdate};

/// GET /api/specialties - active specialties
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Specialty>>> {
    let specialties = specialty::find_all(&state.pool).await?;
    Ok(Json(specialties))
}

/// GET /api/specialties/all - including deactivated ones
pub async fn list_with_inactive(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Specialty>>> {
    let specialties = specialty::find_all_with_inactive(&state.pool).await?;
    Ok(Json(specialties))
}

/// GET /api/specialties/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Specialty>> {
    let found = specialty::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::SpecialtyNotFound, format!("Specialty {id} not found"))
        })?;
    Ok(Json(found))
}

/// POST /api/specialties - create (admin)
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<SpecialtyCreate>,
) -> AppResult<Json<Specialty>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let created = specialty::create(&state.pool, payload).await?;
    tracing::info!(specialty_id = created.id, name = %created.name, "Specialty created");
    Ok(Json(created))
}

/// PUT /api/specialties/{id} - update/deactivate (admin)
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SpecialtyUpdate>,
) -> AppResult<Json<Specialty>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;

    let updated = specialty::update(&state.pool, id, payload).await?;
    Ok(Json(updated))
}

/// DELETE /api/specialties/{id} - hard delete when unused (admin)
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = specialty::delete(&state.pool, id).await?;
    Ok(Json(deleted))
}
