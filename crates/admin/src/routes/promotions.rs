//! Promotion route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use solara_core::{Promotion, PromotionId};

use crate::db::PromotionRepository;
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Promotion create/update request.
#[derive(Debug, Deserialize)]
pub struct PromotionRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub discount_percent: u8,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// List all promotions.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<Promotion>>, AppError> {
    let promotions = PromotionRepository::new(state.pool()).list().await?;
    Ok(Json(promotions))
}

/// Show one promotion.
///
/// # Errors
///
/// Returns 404 for unknown promotions.
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Promotion>, AppError> {
    let promotion = PromotionRepository::new(state.pool())
        .get_by_id(PromotionId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("promotion {id}")))?;
    Ok(Json(promotion))
}

/// Create a promotion.
///
/// # Errors
///
/// Returns 422 for invalid discount or an inverted date range.
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<PromotionRequest>,
) -> Result<(StatusCode, Json<Promotion>), AppError> {
    let promotion = PromotionRepository::new(state.pool())
        .create(
            body.name.trim(),
            body.description.trim(),
            body.discount_percent,
            body.starts_on,
            body.ends_on,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(promotion)))
}

/// Update a promotion.
///
/// # Errors
///
/// Returns 404 for unknown promotions, 422 for invalid fields.
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<PromotionRequest>,
) -> Result<Json<Promotion>, AppError> {
    let promotion = PromotionRepository::new(state.pool())
        .update(
            PromotionId::new(id),
            body.name.trim(),
            body.description.trim(),
            body.discount_percent,
            body.starts_on,
            body.ends_on,
            body.active,
        )
        .await?;
    Ok(Json(promotion))
}

/// Delete a promotion.
///
/// # Errors
///
/// Returns 404 for unknown promotions.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    PromotionRepository::new(state.pool())
        .delete(PromotionId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
