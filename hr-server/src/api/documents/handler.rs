//! Document API Handlers

use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::core::AppState;
use crate::db::repository::{
    document::{self, DocumentFilter},
    employee,
};
use crate::services::FileStorage;
use crate::utils::validation::{MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{DocumentAttachment, DocumentCreate, DocumentKind};

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub kind: Option<DocumentKind>,
}

/// GET /api/employees/{id}/documents - attachments of a profile
pub async fn list(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DocumentAttachment>>> {
    employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
        })?;

    let filter = DocumentFilter {
        search: query.search.filter(|s| !s.is_empty()),
        kind: query.kind,
    };
    let documents = document::find_by_employee(&state.pool, id, &filter).await?;
    Ok(Json(documents))
}

/// GET /api/documents/{id} - attachment metadata
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<DocumentAttachment>> {
    let doc = document::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::DocumentNotFound, format!("Document {id} not found"))
        })?;
    Ok(Json(doc))
}

/// POST /api/employees/{id}/documents - upload an attachment
///
/// Multipart fields: `file` (the upload), `kind`, `name`, `description`.
pub async fn upload(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> AppResult<Json<DocumentAttachment>> {
    employee::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::EmployeeNotFound, format!("Employee {id} not found"))
        })?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut kind: Option<DocumentKind> = None;
    let mut name: Option<String> = None;
    let mut description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
                    .to_vec();
                file = Some((filename, data));
            }
            "kind" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?;
                kind = Some(
                    serde_json::from_value(serde_json::Value::String(value.clone())).map_err(
                        |_| {
                            AppError::validation(format!("Unknown document kind '{value}'"))
                                .with_detail("field", "kind")
                        },
                    )?,
                );
            }
            "name" => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?,
                );
            }
            "description" => {
                description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| {
        AppError::with_message(ErrorCode::NoFileProvided, "No 'file' field found")
    })?;
    // Display name falls back to the uploaded file's name
    let name = name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| filename.clone());
    validate_required_text(&name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&description, "description", MAX_NOTE_LEN)?;
    let kind = kind.unwrap_or(DocumentKind::Other);

    let storage = FileStorage::new(&state.config);
    let stored_file = storage.store_document(&filename, &data)?;

    let metadata = DocumentCreate {
        kind,
        name,
        description,
    };

    let doc = match document::create(&state.pool, id, &metadata, &stored_file).await {
        Ok(doc) => doc,
        Err(e) => {
            // Metadata insert failed: release the file we just stored
            storage.delete_document(&stored_file);
            return Err(e.into());
        }
    };

    tracing::info!(
        employee_id = id,
        document_id = doc.id,
        kind = doc.kind.label(),
        "Document uploaded"
    );

    Ok(Json(doc))
}

/// GET /api/documents/{id}/file - download the stored file
pub async fn download(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let doc = document::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::DocumentNotFound, format!("Document {id} not found"))
        })?;

    let storage = FileStorage::new(&state.config);
    let path = storage.document_path(&doc.stored_file)?;
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found("Stored file"))?;

    let mime = mime_guess::from_path(&doc.stored_file).first_or_octet_stream();

    Response::builder()
        .header(http::header::CONTENT_TYPE, mime.as_ref())
        .header(
            http::header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", doc.stored_file),
        )
        .body(Body::from(bytes))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))
}

/// DELETE /api/documents/{id} - delete the row, then release the file
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let stored_file = document::delete(&state.pool, id).await?;

    let storage = FileStorage::new(&state.config);
    storage.delete_document(&stored_file);

    tracing::info!(document_id = id, "Document deleted");
    Ok(Json(true))
}
