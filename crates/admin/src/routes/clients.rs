//! Client management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use solara_core::{Client, ClientId, Email};

use crate::db::ClientRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::ClientNote;
use crate::state::AppState;

/// Query parameters for the client listing.
#[derive(Debug, Deserialize)]
pub struct ClientListQuery {
    /// Matches name, email, or phone.
    pub q: Option<String>,
}

/// Client create/update request.
#[derive(Debug, Deserialize)]
pub struct ClientRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

/// Credit adjustment request. The amount is signed.
#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    pub amount: Decimal,
}

/// New note request.
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub text: String,
}

/// List clients, optionally filtered by a search term.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<ClientListQuery>,
) -> Result<Json<Vec<Client>>, AppError> {
    let clients = ClientRepository::new(state.pool())
        .list(query.q.as_deref())
        .await?;
    Ok(Json(clients))
}

/// Show one client.
///
/// # Errors
///
/// Returns 404 for unknown clients.
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Client>, AppError> {
    let client = ClientRepository::new(state.pool())
        .get_by_id(ClientId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("client {id}")))?;
    Ok(Json(client))
}

/// Create a walk-in client (no login credentials).
///
/// # Errors
///
/// Returns 409 for duplicate emails, 422 for invalid ones.
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<ClientRequest>,
) -> Result<(StatusCode, Json<Client>), AppError> {
    let email = parse_email(&body.email)?;
    let client = ClientRepository::new(state.pool())
        .create(&email, body.name.trim(), body.phone.trim())
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

/// Update a client's contact details.
///
/// # Errors
///
/// Returns 404 for unknown clients, 409 for email conflicts.
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<ClientRequest>,
) -> Result<Json<Client>, AppError> {
    let email = parse_email(&body.email)?;
    let client = ClientRepository::new(state.pool())
        .update(ClientId::new(id), &email, body.name.trim(), body.phone.trim())
        .await?;
    Ok(Json(client))
}

/// Delete a client without history.
///
/// # Errors
///
/// Returns 409 when the client has appointments or comandas.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    ClientRepository::new(state.pool())
        .delete(ClientId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adjust a client's credit balance by a signed amount.
///
/// # Errors
///
/// Returns 422 when the balance would go negative.
pub async fn adjust_credit(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<CreditRequest>,
) -> Result<Json<Client>, AppError> {
    let client = ClientRepository::new(state.pool())
        .adjust_credit(ClientId::new(id), body.amount)
        .await?;
    Ok(Json(client))
}

/// List a client's notes.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_notes(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Vec<ClientNote>>, AppError> {
    let notes = ClientRepository::new(state.pool())
        .list_notes(ClientId::new(id))
        .await?;
    Ok(Json(notes))
}

/// Add a note to a client profile.
///
/// # Errors
///
/// Returns 422 for empty notes, 404 for unknown clients.
pub async fn add_note(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<NoteRequest>,
) -> Result<(StatusCode, Json<ClientNote>), AppError> {
    let text = body.text.trim();
    if text.is_empty() {
        return Err(AppError::Unprocessable("note cannot be empty".to_string()));
    }

    let note = ClientRepository::new(state.pool())
        .add_note(ClientId::new(id), admin.id, text)
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// Parse and 422-map an email field.
fn parse_email(raw: &str) -> Result<Email, AppError> {
    Email::parse(raw.trim()).map_err(|e| AppError::Unprocessable(e.to_string()))
}
