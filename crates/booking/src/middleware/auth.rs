//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring client authentication in route handlers.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentClient, session_keys};

/// Extractor that requires client authentication.
///
/// If the client is not logged in, the request is rejected with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(client): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", client.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentClient);

/// Error returned when authentication is required but the client is not logged in.
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "authentication required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(AuthRejection)?;

        // Get the current client from the session
        let client: CurrentClient = session
            .get(session_keys::CURRENT_CLIENT)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection)?;

        Ok(Self(client))
    }
}

/// Extractor that optionally gets the current client.
///
/// Unlike `RequireAuth`, this does not reject the request if the client is
/// not logged in.
pub struct OptionalAuth(pub Option<CurrentClient>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let client = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<CurrentClient>(session_keys::CURRENT_CLIENT)
                .await
                .ok()
                .flatten(),
            None => None,
        };

        Ok(Self(client))
    }
}

/// Helper to set the current client in the session.
///
/// Cycles the session ID first, so a pre-login session cannot be fixed to
/// the authenticated one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_client(
    session: &Session,
    client: &CurrentClient,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_CLIENT, client).await
}

/// Helper to clear the current client from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_client(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
