//! Public catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Local;
use serde::{Deserialize, Serialize};

use solara_core::{Product, Professional, ProfessionalId, Promotion, Service, ServiceCategory};

use crate::db::CatalogRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Query parameters for the service listing.
#[derive(Debug, Deserialize)]
pub struct ServiceListQuery {
    pub category: Option<ServiceCategory>,
}

/// Public view of a professional: just enough to pick one while booking.
///
/// Commission rates and permission flags stay internal.
#[derive(Debug, Serialize)]
pub struct PublicProfessional {
    pub id: ProfessionalId,
    pub name: String,
}

impl From<Professional> for PublicProfessional {
    fn from(p: Professional) -> Self {
        Self {
            id: p.id,
            name: p.name,
        }
    }
}

/// List active services, optionally filtered by category.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_services(
    State(state): State<AppState>,
    Query(query): Query<ServiceListQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = CatalogRepository::new(state.pool())
        .list_active_services(query.category)
        .await?;
    Ok(Json(services))
}

/// Show a single active service.
///
/// # Errors
///
/// Returns 404 for unknown or deactivated services.
pub async fn show_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Service>, AppError> {
    let service = CatalogRepository::new(state.pool())
        .get_service(id.into())
        .await?
        .filter(|s| s.active)
        .ok_or_else(|| AppError::NotFound(format!("service {id}")))?;
    Ok(Json(service))
}

/// List active products.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = CatalogRepository::new(state.pool())
        .list_active_products()
        .await?;
    Ok(Json(products))
}

/// List promotions in effect today.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_promotions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Promotion>>, AppError> {
    let today = Local::now().date_naive();
    let promotions = CatalogRepository::new(state.pool())
        .list_active_promotions(today)
        .await?;
    Ok(Json(promotions))
}

/// List active professionals (public subset).
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list_professionals(
    State(state): State<AppState>,
) -> Result<Json<Vec<PublicProfessional>>, AppError> {
    let professionals = CatalogRepository::new(state.pool())
        .list_active_professionals()
        .await?;
    Ok(Json(
        professionals.into_iter().map(Into::into).collect(),
    ))
}
