//! Admin authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::{RequireAdminAuth, clear_current_admin, set_current_admin};
use crate::models::{AdminUser, CurrentAdmin};
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login with email and password.
///
/// Wrong passwords, unknown emails, and deactivated accounts all get the
/// same 401.
///
/// # Errors
///
/// Returns 401 on bad credentials.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AdminUser>, AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .login_with_password(body.email.trim(), &body.password)
        .await
        .map_err(|e| match e {
            // Database trouble is a 500, not a credentials failure
            AuthError::Repository(err) => AppError::from(err),
            _ => AppError::Unauthorized("invalid email or password".to_string()),
        })?;

    let current = CurrentAdmin {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    };
    set_current_admin(&session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to establish session: {e}")))?;

    tracing::info!(admin_id = %user.id, "admin logged in");
    Ok(Json(user))
}

/// Destroy the current session.
///
/// # Errors
///
/// Returns 500 if the session store fails.
pub async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Return the currently logged-in admin user.
///
/// # Errors
///
/// Returns 401 when not logged in.
pub async fn me(
    State(state): State<AppState>,
    RequireAdminAuth(current): RequireAdminAuth,
) -> Result<Json<AdminUser>, AppError> {
    let auth = AuthService::new(state.pool());
    let user = auth.get_user(current.id).await?;
    Ok(Json(user))
}
