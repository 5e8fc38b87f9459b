//! Authentication Handlers

use std::time::Duration;

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, credential};
use crate::core::AppState;
use crate::db::repository::{employee, identity};
use crate::utils::{AppError, AppResult, ErrorCode};
use shared::models::{EmployeeProfile, IdentityResponse};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub identity: IdentityResponse,
}

/// Login handler
///
/// Authenticates credentials and returns a JWT token. Identities carrying
/// an unusable credential are rejected until their password is reset.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let found = identity::find_by_username(&state.pool, &req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // Unified error message below prevents username enumeration
    let Some(identity) = found else {
        tracing::warn!(target: "security", username = %req.username, "Login failed - user not found");
        return Err(AppError::invalid_credentials());
    };

    if !identity.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let Some(hash) = identity.password_hash.as_deref().filter(|h| !h.is_empty()) else {
        // Unusable credential: the account exists but must be reset first
        return Err(AppError::new(ErrorCode::CredentialResetRequired));
    };

    let password_valid = credential::verify_password(hash, &req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        tracing::warn!(target: "security", username = %req.username, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let role = if identity.is_admin { "admin" } else { "staff" };
    let token = state
        .jwt_service
        .generate_token(identity.id, &identity.username, role)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(username = %identity.username, "Login successful");

    Ok(Json(LoginResponse {
        token,
        identity: identity.into(),
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub identity: IdentityResponse,
    /// Linked employee profile, when one exists
    pub profile: Option<EmployeeProfile>,
}

/// Current identity (and its employee profile) for the presented token
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<MeResponse>> {
    let identity = identity::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::IdentityNotFound))?;
    let profile = employee::find_by_identity(&state.pool, identity.id).await?;
    Ok(Json(MeResponse {
        identity: identity.into(),
        profile,
    }))
}
