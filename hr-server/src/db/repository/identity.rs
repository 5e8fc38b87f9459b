//! Identity Repository
//!
//! The identity collaborator: login accounts optionally linked to employee
//! profiles. Credential policy here is limited to hash/verify plus the
//! unusable-credential marker (NULL password hash).

use super::{RepoError, RepoResult};
use crate::auth::credential;
use shared::models::{Identity, IdentityCreate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

const IDENTITY_SELECT: &str = "SELECT id, username, email, first_name, last_name, password_hash, is_admin, is_active, created_at, updated_at FROM identity";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Identity>> {
    let sql = format!("{IDENTITY_SELECT} WHERE id = ?");
    let identity = sqlx::query_as::<_, Identity>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(identity)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Identity>> {
    let sql = format!("{IDENTITY_SELECT} WHERE username = ? LIMIT 1");
    let identity = sqlx::query_as::<_, Identity>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(identity)
}

pub async fn username_exists(conn: &mut SqliteConnection, username: &str) -> RepoResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM identity WHERE username = ?")
            .bind(username)
            .fetch_one(&mut *conn)
            .await?;
    Ok(count > 0)
}

/// Create an identity. A missing password creates the account with an
/// unusable credential (login blocked until reset).
pub async fn create(conn: &mut SqliteConnection, data: IdentityCreate) -> RepoResult<Identity> {
    if username_exists(&mut *conn, &data.username).await? {
        return Err(RepoError::Duplicate(format!(
            "Username '{}' already exists",
            data.username
        )));
    }

    let password_hash = match &data.password {
        Some(password) => Some(
            credential::hash_password(password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?,
        ),
        None => None,
    };

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO identity (id, username, email, first_name, last_name, password_hash, is_admin, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, 1, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&data.email)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&password_hash)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let sql = format!("{IDENTITY_SELECT} WHERE id = ?");
    sqlx::query_as::<_, Identity>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create identity".into()))
}

/// One-way profile→identity field propagation: fill name/email only where
/// the identity side is empty, and force the credential unusable.
pub async fn apply_profile_sync(
    conn: &mut SqliteConnection,
    id: i64,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> RepoResult<Identity> {
    let now = now_millis();
    let rows = sqlx::query(
        "UPDATE identity SET
            first_name = CASE WHEN first_name = '' THEN ?1 ELSE first_name END,
            last_name = CASE WHEN last_name = '' THEN ?2 ELSE last_name END,
            email = CASE WHEN email = '' THEN ?3 ELSE email END,
            password_hash = NULL,
            updated_at = ?4
        WHERE id = ?5",
    )
    .bind(first_name)
    .bind(last_name)
    .bind(email)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Identity {id} not found")));
    }

    let sql = format!("{IDENTITY_SELECT} WHERE id = ?");
    sqlx::query_as::<_, Identity>(&sql)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Identity {id} not found")))
}

/// Set a usable credential (password reset).
pub async fn set_password(pool: &SqlitePool, id: i64, password: &str) -> RepoResult<()> {
    let hash = credential::hash_password(password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;
    let now = now_millis();
    let rows = sqlx::query("UPDATE identity SET password_hash = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Identity {id} not found")));
    }
    Ok(())
}

/// Hard delete. Cascades to the linked employee profile (and its vacation
/// requests and documents) through the foreign keys.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM identity WHERE id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await?;
    Ok(rows.rows_affected() > 0)
}
