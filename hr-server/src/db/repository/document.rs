//! Document Attachment Repository

use super::{RepoError, RepoResult};
use shared::models::{DocumentAttachment, DocumentCreate, DocumentKind};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const DOCUMENT_SELECT: &str = "SELECT id, employee_id, kind, name, stored_file, description, uploaded_at FROM document";

/// Detail-view filters (free-text over name/description/file, kind).
#[derive(Debug, Default, Clone)]
pub struct DocumentFilter {
    pub search: Option<String>,
    pub kind: Option<DocumentKind>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<DocumentAttachment>> {
    let sql = format!("{DOCUMENT_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, DocumentAttachment>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Documents of an employee, newest upload first.
pub async fn find_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
    filter: &DocumentFilter,
) -> RepoResult<Vec<DocumentAttachment>> {
    let mut sql = format!("{DOCUMENT_SELECT} WHERE employee_id = ?");
    if filter.search.is_some() {
        sql.push_str(" AND (name LIKE ? OR description LIKE ? OR stored_file LIKE ?)");
    }
    if filter.kind.is_some() {
        sql.push_str(" AND kind = ?");
    }
    sql.push_str(" ORDER BY uploaded_at DESC");

    let mut query = sqlx::query_as::<_, DocumentAttachment>(&sql).bind(employee_id);
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        query = query.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
    }
    if let Some(kind) = filter.kind {
        query = query.bind(kind);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

/// Stored file names for every document of an employee (released before the
/// rows go away with the profile).
pub async fn stored_files_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
) -> RepoResult<Vec<String>> {
    let files: Vec<String> =
        sqlx::query_scalar("SELECT stored_file FROM document WHERE employee_id = ?")
            .bind(employee_id)
            .fetch_all(pool)
            .await?;
    Ok(files)
}

pub async fn create(
    pool: &SqlitePool,
    employee_id: i64,
    data: &DocumentCreate,
    stored_file: &str,
) -> RepoResult<DocumentAttachment> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO document (id, employee_id, kind, name, stored_file, description, uploaded_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(data.kind)
    .bind(&data.name)
    .bind(stored_file)
    .bind(&data.description)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create document".into()))
}

/// Delete the metadata row. Returns the stored file name so the caller can
/// release the underlying file.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<String> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Document {id} not found")))?;

    sqlx::query("DELETE FROM document WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(existing.stored_file)
}
