//! Client account and onboarding route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;

use solara_core::Client;

use crate::db::ClientRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{CurrentClient, session_keys};
use crate::state::AppState;

/// Profile update request.
///
/// `welcomed` may only be set; sending `false` is rejected because the
/// onboarding flag never unsets.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub phone: String,
    pub welcomed: Option<bool>,
}

/// Return the logged-in client's profile with onboarding flags.
///
/// # Errors
///
/// Returns 404 if the account no longer exists.
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<Json<Client>, AppError> {
    let client = ClientRepository::new(state.pool())
        .get_by_id(current.id)
        .await?
        .ok_or_else(|| AppError::NotFound("account not found".to_string()))?;
    Ok(Json(client))
}

/// Update contact info and onboarding flags.
///
/// `profile_completed` is derived server-side once name and phone are both
/// filled in.
///
/// # Errors
///
/// Returns 422 for an attempt to unset `welcomed`.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    session: Session,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Client>, AppError> {
    if body.welcomed == Some(false) {
        return Err(AppError::Unprocessable(
            "welcomed cannot be unset".to_string(),
        ));
    }

    let repo = ClientRepository::new(state.pool());
    let mut client = repo
        .update_profile(current.id, body.name.trim(), body.phone.trim())
        .await?;

    if body.welcomed == Some(true) && !client.welcomed {
        client = repo.set_welcomed(current.id).await?;
    }

    // Keep the session's display name in sync with the profile.
    let refreshed = CurrentClient {
        id: client.id,
        email: client.email.clone(),
        name: client.name.clone(),
    };
    session
        .insert(session_keys::CURRENT_CLIENT, &refreshed)
        .await
        .map_err(|e| AppError::Internal(format!("failed to update session: {e}")))?;

    Ok(Json(client))
}
