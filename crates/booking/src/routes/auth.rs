//! Client authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use solara_core::Client;

use crate::error::AppError;
use crate::middleware::{RequireAuth, clear_current_client, set_current_client};
use crate::models::CurrentClient;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register a new client account and establish a session.
///
/// # Errors
///
/// Returns 422 for invalid email/password, 409 if the email is taken.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let auth = AuthService::new(state.pool());
    let client = auth
        .register_with_password(
            body.email.trim(),
            &body.password,
            &body.name,
            &body.phone,
        )
        .await?;

    establish_session(&session, &client).await?;

    tracing::info!(client_id = %client.id, "client registered");
    Ok((StatusCode::CREATED, Json(client)))
}

/// Login with email and password.
///
/// Failures are a uniform 401 so the endpoint can't be used to probe which
/// emails have accounts.
///
/// # Errors
///
/// Returns 401 on bad credentials.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Client>, AppError> {
    let auth = AuthService::new(state.pool());
    let client = auth
        .login_with_password(body.email.trim(), &body.password)
        .await
        .map_err(|e| match e {
            // Database trouble is a 500, not a credentials failure
            AuthError::Repository(err) => AppError::from(err),
            _ => AppError::Unauthorized("invalid email or password".to_string()),
        })?;

    establish_session(&session, &client).await?;

    tracing::info!(client_id = %client.id, "client logged in");
    Ok(Json(client))
}

/// Destroy the current session.
///
/// # Errors
///
/// Returns 500 if the session store fails.
pub async fn logout(session: Session) -> Result<StatusCode, AppError> {
    clear_current_client(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Return the currently logged-in client.
///
/// # Errors
///
/// Returns 401 when not logged in, 404 if the account was deleted since.
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Client>, AppError> {
    let auth = AuthService::new(state.pool());
    let client = auth.get_client(current.id).await?;
    Ok(Json(client))
}

/// Store the client identity in a fresh session.
async fn establish_session(session: &Session, client: &Client) -> Result<(), AppError> {
    let current = CurrentClient {
        id: client.id,
        email: client.email.clone(),
        name: client.name.clone(),
    };
    set_current_client(session, &current)
        .await
        .map_err(|e| AppError::Internal(format!("failed to establish session: {e}")))
}
