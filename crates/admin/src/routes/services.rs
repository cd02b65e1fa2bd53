//! Service catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use solara_core::{Service, ServiceCategory, ServiceId};

use crate::db::{Removal, ServiceRepository};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Service create/update request.
#[derive(Debug, Deserialize)]
pub struct ServiceRequest {
    pub name: String,
    pub category: ServiceCategory,
    pub price: Decimal,
    pub duration_minutes: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// List all services.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = ServiceRepository::new(state.pool()).list().await?;
    Ok(Json(services))
}

/// Show one service.
///
/// # Errors
///
/// Returns 404 for unknown services.
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Service>, AppError> {
    let service = ServiceRepository::new(state.pool())
        .get_by_id(ServiceId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;
    Ok(Json(service))
}

/// Create a service.
///
/// # Errors
///
/// Returns 422 for invalid price or duration.
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    let service = ServiceRepository::new(state.pool())
        .create(
            body.name.trim(),
            body.category,
            body.price,
            body.duration_minutes,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Update a service.
///
/// # Errors
///
/// Returns 404 for unknown services, 422 for invalid fields.
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<ServiceRequest>,
) -> Result<Json<Service>, AppError> {
    let service = ServiceRepository::new(state.pool())
        .update(
            ServiceId::new(id),
            body.name.trim(),
            body.category,
            body.price,
            body.duration_minutes,
            body.active,
        )
        .await?;
    Ok(Json(service))
}

/// Delete a service; falls back to deactivation when it is referenced by
/// appointments or comanda history.
///
/// # Errors
///
/// Returns 404 for unknown services.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    match ServiceRepository::new(state.pool())
        .remove(ServiceId::new(id))
        .await?
    {
        Removal::Deleted => Ok(StatusCode::NO_CONTENT),
        Removal::Deactivated => Ok(StatusCode::OK),
    }
}
