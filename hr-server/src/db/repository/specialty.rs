//! Specialty Repository

use super::{RepoError, RepoResult};
use shared::error::ErrorCode;
use shared::models::{Specialty, SpecialtyCreate, SpecialtyUpdate};
use shared::util::snowflake_id;
use sqlx::SqlitePool;

const SPECIALTY_SELECT: &str = "SELECT id, name, description, is_active FROM specialty";

/// Find all active specialties ordered by name
pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Specialty>> {
    let sql = format!("{SPECIALTY_SELECT} WHERE is_active = 1 ORDER BY name");
    let rows = sqlx::query_as::<_, Specialty>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

/// Find all specialties including inactive
pub async fn find_all_with_inactive(pool: &SqlitePool) -> RepoResult<Vec<Specialty>> {
    let sql = format!("{SPECIALTY_SELECT} ORDER BY name");
    let rows = sqlx::query_as::<_, Specialty>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Specialty>> {
    let sql = format!("{SPECIALTY_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Specialty>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Specialty>> {
    let sql = format!("{SPECIALTY_SELECT} WHERE name = ? LIMIT 1");
    let row = sqlx::query_as::<_, Specialty>(&sql)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: SpecialtyCreate) -> RepoResult<Specialty> {
    if find_by_name(pool, &data.name).await?.is_some() {
        return Err(RepoError::Business(
            ErrorCode::SpecialtyNameExists,
            format!("Specialty '{}' already exists", data.name),
        ));
    }

    let id = snowflake_id();
    sqlx::query("INSERT INTO specialty (id, name, description, is_active) VALUES (?1, ?2, ?3, 1)")
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create specialty".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: SpecialtyUpdate) -> RepoResult<Specialty> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Specialty {id} not found")))?;

    if let Some(ref new_name) = data.name
        && new_name != &existing.name
        && find_by_name(pool, new_name).await?.is_some()
    {
        return Err(RepoError::Business(
            ErrorCode::SpecialtyNameExists,
            format!("Specialty '{new_name}' already exists"),
        ));
    }

    let rows = sqlx::query(
        "UPDATE specialty SET name = COALESCE(?1, name), description = COALESCE(?2, description), is_active = COALESCE(?3, is_active) WHERE id = ?4",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Specialty {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Specialty {id} not found")))
}

/// Number of profiles a specialty is attached to.
pub async fn attachment_count(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employee_specialty WHERE specialty_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}

/// Hard delete an unused specialty. Attached specialties must be
/// deactivated instead.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Specialty {id} not found")))?;

    if attachment_count(pool, id).await? > 0 {
        return Err(RepoError::Business(
            ErrorCode::SpecialtyInUse,
            "Specialty is attached to employee profiles; deactivate it instead".into(),
        ));
    }

    let rows = sqlx::query("DELETE FROM specialty WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
