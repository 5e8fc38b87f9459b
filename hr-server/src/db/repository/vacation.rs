//! Vacation Request Repository
//!
//! Holds the two deliberately distinct usage aggregates:
//!
//! - [`sum_active_days`] counts {approved, in_progress} and feeds the
//!   employee-level "available balance";
//! - [`sum_counted_days_excluding`] counts {approved, in_progress,
//!   completed} minus one request, and feeds the request-level "days left
//!   if this one is excluded".
//!
//! The divergence (whether `completed` counts) comes from the original
//! business rule and is preserved as-is pending product clarification.

use super::{RepoError, RepoResult};
use crate::leave;
use shared::models::{VacationCreate, VacationRequest};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

const VACATION_SELECT: &str = "SELECT id, employee_id, start_date, end_date, requested_days, reason, status, approved_by, approved_at, approval_comment, created_at, updated_at FROM vacation_request";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<VacationRequest>> {
    let sql = format!("{VACATION_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, VacationRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// All requests for an employee, most recent start date first.
pub async fn find_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
) -> RepoResult<Vec<VacationRequest>> {
    let sql = format!("{VACATION_SELECT} WHERE employee_id = ? ORDER BY start_date DESC");
    let rows = sqlx::query_as::<_, VacationRequest>(&sql)
        .bind(employee_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Latest `limit` requests for the profile detail view.
pub async fn find_recent_by_employee(
    pool: &SqlitePool,
    employee_id: i64,
    limit: i64,
) -> RepoResult<Vec<VacationRequest>> {
    let sql = format!("{VACATION_SELECT} WHERE employee_id = ? ORDER BY start_date DESC LIMIT ?");
    let rows = sqlx::query_as::<_, VacationRequest>(&sql)
        .bind(employee_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Create a request in `pending` state.
///
/// The requested-day count is always recomputed from the date range here at
/// the persistence boundary, overwriting any client-supplied value; an
/// empty or inverted range is a fatal validation failure.
pub async fn create(
    pool: &SqlitePool,
    employee_id: i64,
    data: &VacationCreate,
) -> RepoResult<VacationRequest> {
    let requested_days = leave::requested_day_count(data.start_date, data.end_date)?;

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO vacation_request (id, employee_id, start_date, end_date, requested_days, reason, status, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'pending', ?7, ?7)",
    )
    .bind(id)
    .bind(employee_id)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(requested_days)
    .bind(&data.reason)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create vacation request".into()))
}

/// Sum of requested days over {approved, in_progress} requests starting in
/// `year`. Missing data counts as zero usage.
pub async fn sum_active_days(
    pool: &SqlitePool,
    employee_id: i64,
    year: i32,
) -> RepoResult<i64> {
    let (from, to) = leave::year_bounds(year);
    let sum: Option<i64> = sqlx::query_scalar(
        "SELECT SUM(requested_days) FROM vacation_request WHERE employee_id = ?1 AND status IN ('approved', 'in_progress') AND start_date BETWEEN ?2 AND ?3",
    )
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .fetch_one(pool)
    .await?;
    Ok(sum.unwrap_or(0))
}

/// Sum of requested days over {approved, in_progress, completed} requests
/// starting in `year`, excluding one request (used when re-evaluating an
/// already-counted request). Missing data counts as zero usage.
pub async fn sum_counted_days_excluding(
    pool: &SqlitePool,
    employee_id: i64,
    year: i32,
    exclude_id: i64,
) -> RepoResult<i64> {
    let (from, to) = leave::year_bounds(year);
    let sum: Option<i64> = sqlx::query_scalar(
        "SELECT SUM(requested_days) FROM vacation_request WHERE employee_id = ?1 AND status IN ('approved', 'in_progress', 'completed') AND start_date BETWEEN ?2 AND ?3 AND id != ?4",
    )
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(sum.unwrap_or(0))
}

/// Outcome of a decide attempt.
#[derive(Debug, Clone)]
pub enum DecideOutcome {
    /// The transition was applied; approver and timestamp recorded.
    Decided(VacationRequest),
    /// The request had already been decided; state unchanged.
    AlreadyDecided(VacationRequest),
}

/// Apply an approve/reject decision.
///
/// The UPDATE is guarded on `status = 'pending'` so a concurrent decision
/// loses cleanly: the second writer observes zero affected rows and reports
/// the already-decided warning.
pub async fn decide(
    pool: &SqlitePool,
    id: i64,
    action: leave::DecisionAction,
    approver_id: i64,
    comment: Option<&str>,
) -> RepoResult<DecideOutcome> {
    let existing = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Vacation request {id} not found")))?;

    match leave::apply_decision(existing.status, action) {
        leave::Transition::AlreadyDecided(_) => Ok(DecideOutcome::AlreadyDecided(existing)),
        leave::Transition::Applied(new_status) => {
            let now = now_millis();
            let rows = sqlx::query(
                "UPDATE vacation_request SET status = ?1, approved_by = ?2, approved_at = ?3, approval_comment = ?4, updated_at = ?3 WHERE id = ?5 AND status = 'pending'",
            )
            .bind(new_status)
            .bind(approver_id)
            .bind(now)
            .bind(comment)
            .bind(id)
            .execute(pool)
            .await?;

            let updated = find_by_id(pool, id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Vacation request {id} not found")))?;

            if rows.rows_affected() == 0 {
                // Lost a race against a concurrent decision
                Ok(DecideOutcome::AlreadyDecided(updated))
            } else {
                Ok(DecideOutcome::Decided(updated))
            }
        }
    }
}
