//! Product catalog route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use solara_core::{Product, ProductId};

use crate::db::{ProductRepository, Removal};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::state::AppState;

/// Product creation request.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub stock_quantity: i32,
}

/// Product update request. Stock moves through the stock endpoint.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// Stock adjustment request. The amount is signed.
#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub amount: i32,
}

/// List all products.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Show one product.
///
/// # Errors
///
/// Returns 404 for unknown products.
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// Create a product.
///
/// # Errors
///
/// Returns 422 for negative price or stock.
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = ProductRepository::new(state.pool())
        .create(body.name.trim(), body.price, body.stock_quantity)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product's name, price, and active flag.
///
/// # Errors
///
/// Returns 404 for unknown products.
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), body.name.trim(), body.price, body.active)
        .await?;
    Ok(Json(product))
}

/// Adjust stock by a signed amount.
///
/// # Errors
///
/// Returns 422 when the stock would go negative.
pub async fn adjust_stock(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<StockRequest>,
) -> Result<Json<Product>, AppError> {
    let product = ProductRepository::new(state.pool())
        .adjust_stock(ProductId::new(id), body.amount)
        .await?;
    Ok(Json(product))
}

/// Delete a product; falls back to deactivation when comanda history
/// references it.
///
/// # Errors
///
/// Returns 404 for unknown products.
pub async fn remove(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    match ProductRepository::new(state.pool())
        .remove(ProductId::new(id))
        .await?
    {
        Removal::Deleted => Ok(StatusCode::NO_CONTENT),
        Removal::Deactivated => Ok(StatusCode::OK),
    }
}
