//! Vacation API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::{employee, vacation};
use crate::leave;
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{ApiResponse, AppError, AppResult, ErrorCode, time};
use shared::models::{VacationDecision, VacationRequest};

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// Calendar year for the balance figures; defaults to the current year
    pub year: Option<i32>,
}

/// Request detail plus the request-level balance
#[derive(Debug, Serialize)]
pub struct VacationDetail {
    #[serde(flatten)]
    pub request: VacationRequest,
    pub status_label: &'static str,
    pub year: i32,
    /// Days left for the year if this request is excluded from the count
    /// ({approved, in_progress, completed} minus this request, clamped)
    pub remaining_days_excluding_self: i64,
}

/// GET /api/vacations/{id} - request detail
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<VacationDetail>> {
    let request = vacation::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::VacationNotFound, format!("Vacation request {id} not found"))
        })?;

    let profile = employee::find_by_id(&state.pool, request.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::EmployeeNotFound,
                format!("Employee {} not found", request.employee_id),
            )
        })?;

    let year = query.year.unwrap_or_else(time::current_year);
    let used =
        vacation::sum_counted_days_excluding(&state.pool, request.employee_id, year, id).await?;

    Ok(Json(VacationDetail {
        status_label: request.status.label(),
        year,
        remaining_days_excluding_self: leave::remaining(profile.annual_vacation_days, used),
        request,
    }))
}

/// POST /api/vacations/{id}/{action} - approve or reject a pending request
///
/// Approving records the approver and timestamp. Re-deciding an
/// already-decided request is a no-op surfaced as a warning in the success
/// envelope, never an error; the request state stays unchanged.
pub async fn decide(
    State(state): State<AppState>,
    Path((id, action)): Path<(i64, String)>,
    user: CurrentUser,
    Json(payload): Json<VacationDecision>,
) -> AppResult<ApiResponse<VacationRequest>> {
    let action = leave::DecisionAction::parse(&action).ok_or_else(|| {
        AppError::with_message(ErrorCode::InvalidAction, format!("Unknown action '{action}'"))
    })?;

    validate_optional_text(&payload.comment, "comment", MAX_NOTE_LEN)?;

    let outcome =
        vacation::decide(&state.pool, id, action, user.id, payload.comment.as_deref()).await?;

    match outcome {
        vacation::DecideOutcome::Decided(request) => {
            tracing::info!(
                request_id = id,
                approver = user.id,
                status = request.status.label(),
                "Vacation request decided"
            );
            Ok(ApiResponse::success_with_message(
                action.success_message(),
                request,
            ))
        }
        vacation::DecideOutcome::AlreadyDecided(request) => {
            tracing::warn!(
                request_id = id,
                status = request.status.label(),
                "Decide attempt on an already-processed request"
            );
            Ok(ApiResponse::success_with_message(
                "This request has already been processed",
                request,
            ))
        }
    }
}
