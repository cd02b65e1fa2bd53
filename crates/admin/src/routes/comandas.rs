//! Comanda route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use solara_core::{
    ClientId, ComandaId, ComandaItemId, ComandaStatus, PaymentMethod, ProductId, ProfessionalId,
    ServiceId,
};

use crate::db::{ComandaRepository, NewComandaItem};
use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{Comanda, ComandaItem, ComandaSummary};
use crate::state::AppState;

/// Open-comanda request.
#[derive(Debug, Deserialize)]
pub struct OpenComandaRequest {
    pub client_id: ClientId,
}

/// Comanda listing filters.
#[derive(Debug, Deserialize)]
pub struct ComandaListQuery {
    pub status: Option<ComandaStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// New line item request. Exactly one of the two shapes.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AddItemRequest {
    Service {
        service_id: ServiceId,
        professional_id: ProfessionalId,
    },
    Product {
        product_id: ProductId,
        #[serde(default = "default_quantity")]
        quantity: i32,
    },
}

const fn default_quantity() -> i32 {
    1
}

/// Close request: payment method plus optional flat discount.
#[derive(Debug, Deserialize)]
pub struct CloseComandaRequest {
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub discount: Decimal,
}

/// A comanda plus its derived totals.
#[derive(Debug, Serialize)]
pub struct ComandaResponse {
    #[serde(flatten)]
    pub comanda: Comanda,
    pub subtotal: Decimal,
    pub total: Decimal,
}

impl From<Comanda> for ComandaResponse {
    fn from(comanda: Comanda) -> Self {
        let subtotal = comanda.subtotal();
        let total = comanda.total();
        Self {
            comanda,
            subtotal,
            total,
        }
    }
}

/// Open a comanda for a client.
///
/// # Errors
///
/// Returns 409 if the client already has an open comanda, 404 for unknown
/// clients.
#[instrument(skip(state), fields(client_id = %body.client_id))]
pub async fn open(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Json(body): Json<OpenComandaRequest>,
) -> Result<(StatusCode, Json<ComandaResponse>), AppError> {
    let comanda = ComandaRepository::new(state.pool())
        .open(body.client_id)
        .await?;
    Ok((StatusCode::CREATED, Json(comanda.into())))
}

/// List comandas with computed totals.
///
/// # Errors
///
/// Returns 500 if the database query fails.
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<ComandaListQuery>,
) -> Result<Json<Vec<ComandaSummary>>, AppError> {
    let comandas = ComandaRepository::new(state.pool())
        .list(query.status, query.from, query.to)
        .await?;
    Ok(Json(comandas))
}

/// Show one comanda with items and totals.
///
/// # Errors
///
/// Returns 404 for unknown comandas.
pub async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<ComandaResponse>, AppError> {
    let comanda = ComandaRepository::new(state.pool())
        .get_with_items(ComandaId::new(id))
        .await?;
    Ok(Json(comanda.into()))
}

/// Add a service or product line to an open comanda.
///
/// # Errors
///
/// Returns 422 for closed comandas, inactive catalog entries, or
/// insufficient stock.
pub async fn add_item(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<ComandaItem>), AppError> {
    let item = match body {
        AddItemRequest::Service {
            service_id,
            professional_id,
        } => NewComandaItem::Service {
            service_id,
            professional_id,
        },
        AddItemRequest::Product {
            product_id,
            quantity,
        } => NewComandaItem::Product {
            product_id,
            quantity,
        },
    };

    let created = ComandaRepository::new(state.pool())
        .add_item(ComandaId::new(id), item)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Remove a line from an open comanda, restocking product lines.
///
/// # Errors
///
/// Returns 404 for unknown items, 422 for closed comandas.
pub async fn remove_item(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path((id, item_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    ComandaRepository::new(state.pool())
        .remove_item(ComandaId::new(id), ComandaItemId::new(item_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Close an open comanda.
///
/// # Errors
///
/// Returns 422 for closed comandas or a discount exceeding the subtotal.
#[instrument(skip(state, body), fields(comanda_id = id))]
pub async fn close(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
    Json(body): Json<CloseComandaRequest>,
) -> Result<Json<ComandaResponse>, AppError> {
    let comanda = ComandaRepository::new(state.pool())
        .close(ComandaId::new(id), body.payment_method, body.discount)
        .await?;

    tracing::info!(
        comanda_id = %comanda.id,
        closed_by = %admin.id,
        total = %comanda.total(),
        "comanda closed"
    );
    Ok(Json(comanda.into()))
}

/// Cancel an open comanda, restocking its product lines.
///
/// # Errors
///
/// Returns 422 for comandas that are not open.
pub async fn cancel(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<i32>,
) -> Result<Json<ComandaResponse>, AppError> {
    let comanda = ComandaRepository::new(state.pool())
        .cancel(ComandaId::new(id))
        .await?;

    tracing::info!(comanda_id = %comanda.id, canceled_by = %admin.id, "comanda canceled");
    Ok(Json(comanda.into()))
}
