//! Employee API Handlers

use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::core::AppState;
use crate::db::repository::{
    document::{self, DocumentFilter},
    employee::{self, EmployeeFilter},
    identity, vacation,
};
use crate::leave;
use crate::services::{FileStorage, identity_sync};
use crate::utils::validation::{
    MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN,
    validate_email, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode, time};
use shared::models::{
    Department, DocumentAttachment, DocumentKind, EmployeeCreate, EmployeeProfile,
    EmployeeStatus, EmployeeUpdate, Specialty, VacationCreate, VacationRequest,
};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<EmployeeStatus>,
    pub department: Option<Department>,
    pub specialty: Option<i64>,
}

/// GET /api/employees - list profiles with filters, ordered by code
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<EmployeeProfile>>> {
    let filter = EmployeeFilter {
        search: query.search.filter(|s| !s.is_empty()),
        status: query.status,
        department: query.department,
        specialty_id: query.specialty,
    };
    let employees = employee::find_all(&state.pool, &filter).await?;
    Ok(Json(employees))
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// Free-text filter over the profile's documents
    pub search_doc: Option<String>,
    /// Document kind filter
    pub document_kind: Option<DocumentKind>,
}

/// Profile detail: the profile plus everything its page shows
#[derive(Debug, Serialize)]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub profile: EmployeeProfile,
    pub full_name: String,
    pub age: i32,
    pub tenure_years: i32,
    pub specialties: Vec<Specialty>,
    pub documents: Vec<DocumentAttachment>,
    /// Last 5 vacation entries, newest start date first
    pub recent_vacations: Vec<VacationRequest>,
    /// Available balance for the current year
    pub remaining_days: i64,
}

/// GET /api/employees/{id} - profile detail with documents and the last 5
/// vacation entries
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<EmployeeDetail>> {
    let profile = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    let doc_filter = DocumentFilter {
        search: query.search_doc.filter(|s| !s.is_empty()),
        kind: query.document_kind,
    };

    let specialties = employee::find_specialties(&state.pool, id).await?;
    let documents = document::find_by_employee(&state.pool, id, &doc_filter).await?;
    let recent_vacations = vacation::find_recent_by_employee(&state.pool, id, 5).await?;

    let year = time::current_year();
    let used = vacation::sum_active_days(&state.pool, id, year).await?;
    let remaining_days = leave::remaining(profile.annual_vacation_days, used);

    Ok(Json(EmployeeDetail {
        full_name: profile.full_name(),
        age: profile.age(),
        tenure_years: profile.tenure_years(),
        profile,
        specialties,
        documents,
        recent_vacations,
        remaining_days,
    }))
}

fn validate_create(data: &EmployeeCreate) -> AppResult<()> {
    validate_required_text(&data.first_name, "first_name", MAX_NAME_LEN)?;
    validate_required_text(&data.last_name, "last_name", MAX_NAME_LEN)?;
    validate_email(&data.email, "email")?;
    validate_required_text(&data.national_id, "national_id", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.position, "position", MAX_NAME_LEN)?;
    validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.address, "address", MAX_NOTE_LEN)?;
    validate_optional_text(&data.emergency_phone, "emergency_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.emergency_contact, "emergency_contact", MAX_NAME_LEN)?;
    validate_optional_text(&data.personal_email, "personal_email", MAX_EMAIL_LEN)?;
    validate_optional_text(&data.linkedin_url, "linkedin_url", MAX_URL_LEN)?;
    validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
    if data.annual_vacation_days.is_some_and(|d| d < 0) {
        return Err(AppError::validation("annual_vacation_days must not be negative")
            .with_detail("field", "annual_vacation_days"));
    }
    Ok(())
}

fn validate_update(data: &EmployeeUpdate) -> AppResult<()> {
    if let Some(first_name) = &data.first_name {
        validate_required_text(first_name, "first_name", MAX_NAME_LEN)?;
    }
    if let Some(last_name) = &data.last_name {
        validate_required_text(last_name, "last_name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &data.email {
        validate_email(email, "email")?;
    }
    if let Some(national_id) = &data.national_id {
        validate_required_text(national_id, "national_id", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&data.position, "position", MAX_NAME_LEN)?;
    validate_optional_text(&data.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.address, "address", MAX_NOTE_LEN)?;
    validate_optional_text(&data.emergency_phone, "emergency_phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.emergency_contact, "emergency_contact", MAX_NAME_LEN)?;
    validate_optional_text(&data.personal_email, "personal_email", MAX_EMAIL_LEN)?;
    validate_optional_text(&data.linkedin_url, "linkedin_url", MAX_URL_LEN)?;
    validate_optional_text(&data.notes, "notes", MAX_NOTE_LEN)?;
    if data.annual_vacation_days.is_some_and(|d| d < 0) {
        return Err(AppError::validation("annual_vacation_days must not be negative")
            .with_detail("field", "annual_vacation_days"));
    }
    Ok(())
}

/// POST /api/employees - create a profile
///
/// Profile insert, specialty attachment and identity creation run in one
/// transaction: an identity-side failure rolls back the just-created
/// rows instead of leaving an orphaned account behind.
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<Json<EmployeeProfile>> {
    validate_create(&payload)?;

    let mut tx = state
        .pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    // Advisory sequence; the unique constraint on employee_code backstops races
    let employee_code = match &payload.employee_code {
        Some(code) if !code.is_empty() => code.clone(),
        _ => employee::next_employee_code(&mut *tx).await?,
    };

    let profile = employee::create(&mut *tx, &payload, &employee_code, None).await?;

    if !payload.specialty_ids.is_empty() {
        employee::set_specialties(&mut *tx, profile.id, &payload.specialty_ids).await?;
    }

    // Explicit identity sync: creates and links an account when the profile
    // carries an email
    identity_sync::sync_profile_identity(&mut *tx, &profile).await?;

    // Re-read inside the transaction to pick up the identity link
    let created = employee::find_by_id_conn(&mut *tx, profile.id)
        .await?
        .ok_or_else(|| AppError::database("Created profile disappeared mid-transaction"))?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!(
        employee_id = created.id,
        employee_code = %created.employee_code,
        "Employee profile created"
    );

    Ok(Json(created))
}

/// PUT /api/employees/{id} - update a profile
///
/// Field updates, specialty attachment and the explicit identity sync run
/// in one transaction.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<EmployeeProfile>> {
    employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    validate_update(&payload)?;

    let mut tx = state
        .pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let updated = employee::update(&mut *tx, id, &payload).await?;

    if let Some(specialty_ids) = &payload.specialty_ids {
        employee::set_specialties(&mut *tx, id, specialty_ids).await?;
    }

    // Explicit identity sync: HR edits flow onto the linked account (or
    // create one) and force a password reset
    identity_sync::sync_profile_identity(&mut *tx, &updated).await?;

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let profile = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    Ok(Json(profile))
}

/// DELETE /api/employees/{id} - delete the profile and its linked identity
///
/// Vacation requests and documents cascade with the profile; stored files
/// are released after the transaction commits.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let profile = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    // Collect file references before the rows cascade away
    let stored_files = document::stored_files_by_employee(&state.pool, id).await?;

    let mut tx = state
        .pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let deleted = match profile.identity_id {
        // Deleting the identity cascades to the profile
        Some(identity_id) => identity::delete(&mut *tx, identity_id).await?,
        None => employee::delete(&mut *tx, id).await?,
    };

    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    if deleted {
        let storage = FileStorage::new(&state.config);
        for stored_file in &stored_files {
            storage.delete_document(stored_file);
        }
        if let Some(photo_file) = &profile.photo_file {
            storage.delete_photo(photo_file);
        }
        tracing::info!(employee_id = id, "Employee profile deleted");
    }

    Ok(Json(deleted))
}

/// POST /api/employees/{id}/specialties - replace specialty attachments
pub async fn set_specialties(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(specialty_ids): Json<Vec<i64>>,
) -> AppResult<Json<Vec<Specialty>>> {
    employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    let mut tx = state
        .pool
        .begin()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    employee::set_specialties(&mut *tx, id, &specialty_ids).await?;
    tx.commit()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

    let specialties = employee::find_specialties(&state.pool, id).await?;
    Ok(Json(specialties))
}

// ── Vacations (employee-scoped) ─────────────────────────────────────

/// GET /api/employees/{id}/vacations - full vacation history
pub async fn list_vacations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<VacationRequest>>> {
    employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    let vacations = vacation::find_by_employee(&state.pool, id).await?;
    Ok(Json(vacations))
}

/// POST /api/employees/{id}/vacations - create a pending request
///
/// The requested-day count is derived from the date range; any
/// client-supplied value is overwritten.
pub async fn create_vacation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<VacationCreate>,
) -> AppResult<Json<VacationRequest>> {
    employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let request = vacation::create(&state.pool, id, &payload).await?;

    tracing::info!(
        employee_id = id,
        request_id = request.id,
        requested_days = request.requested_days,
        "Vacation request created"
    );

    Ok(Json(request))
}

#[derive(Debug, Default, Deserialize)]
pub struct RemainingQuery {
    /// Calendar year; defaults to the current year
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct RemainingDays {
    pub employee_id: i64,
    pub year: i32,
    pub annual_vacation_days: i64,
    pub used_days: i64,
    pub remaining_days: i64,
}

/// GET /api/employees/{id}/vacations/remaining - available balance
///
/// Counts {approved, in_progress} requests starting in the year; clamped
/// at zero.
pub async fn remaining_days(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<RemainingQuery>,
) -> AppResult<Json<RemainingDays>> {
    let profile = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    let year = query.year.unwrap_or_else(time::current_year);
    let used_days = vacation::sum_active_days(&state.pool, id, year).await?;

    Ok(Json(RemainingDays {
        employee_id: id,
        year,
        annual_vacation_days: profile.annual_vacation_days,
        used_days,
        remaining_days: leave::remaining(profile.annual_vacation_days, used_days),
    }))
}

// ── Profile photo ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PhotoResponse {
    pub photo_file: String,
    pub url: String,
}

/// POST /api/employees/{id}/photo - upload a profile photo (multipart,
/// field name `file`); the previous photo is released
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<PhotoResponse>> {
    let profile = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    let (filename, data) = read_file_field(&mut multipart).await?;

    let storage = FileStorage::new(&state.config);
    let stored_file = storage.store_photo(&filename, &data)?;

    employee::set_photo_file(&state.pool, id, &stored_file).await?;

    if let Some(old) = &profile.photo_file {
        storage.delete_photo(old);
    }

    let url = format!("/api/employees/{id}/photo");
    Ok(Json(PhotoResponse {
        photo_file: stored_file,
        url,
    }))
}

/// GET /api/employees/{id}/photo - serve the stored profile photo
pub async fn get_photo(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let profile = employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found")))?;

    let photo_file = profile
        .photo_file
        .ok_or_else(|| AppError::not_found("Profile photo"))?;

    let storage = FileStorage::new(&state.config);
    let path = storage.photo_path(&photo_file)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found("Profile photo"))?;

    Response::builder()
        .header(http::header::CONTENT_TYPE, "image/jpeg")
        .body(Body::from(bytes))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))
}

/// Pull the `file` part (name + bytes) out of a multipart request.
pub(crate) async fn read_file_field(
    multipart: &mut Multipart,
) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            let filename = field
                .file_name()
                .map(|s| s.to_string())
                .ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
                .to_vec();
            return Ok((filename, data));
        }
    }
    Err(AppError::with_message(
        ErrorCode::NoFileProvided,
        "No 'file' field found. Field name must be 'file'",
    ))
}
