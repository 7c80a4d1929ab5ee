//! Purchase routes: compras lifecycle and internal purchase orders.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use ferredesk_db::CompraRepository;
use ferredesk_db::repositories::{
    CreateCompraInput, CreateCompraItemInput, CreateOrdenCompraInput,
};
use ferredesk_shared::error::AppError;

use crate::AppState;
use crate::routes::respuesta_error;

/// Creates the compras routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/compras", post(create_compra))
        .route("/compras/{id}/cerrar", post(cerrar_compra))
        .route("/compras/{id}/anular", post(anular_compra))
        .route("/ordenes-compra", post(create_orden))
        .route("/ordenes-compra/{id}/cerrar", post(cerrar_orden))
}

/// One purchase line of the request body.
#[derive(Debug, Deserialize)]
pub struct CompraItemRequest {
    /// Line order.
    pub orden: i32,
    /// Product id; absent lines never touch stock.
    pub idsto: Option<i32>,
    /// Quantity purchased.
    pub cantidad: Decimal,
    /// Unit cost on the invoice.
    #[serde(default)]
    pub costo: Decimal,
    /// Line description.
    pub detalle1: String,
}

impl CompraItemRequest {
    fn into_input(self) -> CreateCompraItemInput {
        CreateCompraItemInput {
            orden: self.orden,
            idsto: self.idsto,
            cantidad: self.cantidad,
            costo: self.costo,
            detalle1: self.detalle1,
        }
    }
}

/// Request body for registering a purchase draft.
#[derive(Debug, Deserialize)]
pub struct CreateCompraRequest {
    /// Supplier.
    pub proveedor_id: i32,
    /// Invoice date.
    pub fecha: NaiveDate,
    /// Supplier's invoice number, unique per supplier.
    pub numero_factura: String,
    /// Net amount as typed from the paper invoice.
    pub neto: Decimal,
    /// IVA at 21%.
    #[serde(default)]
    pub iva_21: Decimal,
    /// IVA at 10.5%.
    #[serde(default)]
    pub iva_105: Decimal,
    /// IVA at 27%.
    #[serde(default)]
    pub iva_27: Decimal,
    /// Invoice total as typed.
    pub total: Decimal,
    /// Free-text note.
    pub observacion: Option<String>,
    /// Purchase lines.
    pub items: Vec<CompraItemRequest>,
}

/// POST `/compras` - Register a purchase draft (BORRADOR).
async fn create_compra(
    State(state): State<AppState>,
    Json(body): Json<CreateCompraRequest>,
) -> impl IntoResponse {
    let repo = CompraRepository::new(state.db.clone());
    let input = CreateCompraInput {
        proveedor_id: body.proveedor_id,
        fecha: body.fecha,
        numero_factura: body.numero_factura,
        neto: body.neto,
        iva_21: body.iva_21,
        iva_105: body.iva_105,
        iva_27: body.iva_27,
        total: body.total,
        observacion: body.observacion,
        items: body.items.into_iter().map(CompraItemRequest::into_input).collect(),
    };
    match repo.crear(input).await {
        Ok(compra) => (StatusCode::CREATED, Json(json!(compra))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// POST `/compras/{id}/cerrar` - Close a draft and apply stock deltas.
async fn cerrar_compra(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = CompraRepository::new(state.db.clone());
    match repo.cerrar(id).await {
        Ok(compra) => (StatusCode::OK, Json(json!(compra))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// POST `/compras/{id}/anular` - Void a compra, reverting stock when it
/// was closed.
async fn anular_compra(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = CompraRepository::new(state.db.clone());
    match repo.anular(id).await {
        Ok(compra) => (StatusCode::OK, Json(json!(compra))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for an internal purchase order.
#[derive(Debug, Deserialize)]
pub struct CreateOrdenRequest {
    /// Supplier.
    pub proveedor_id: i32,
    /// Order date.
    pub fecha: NaiveDate,
    /// Numbering point.
    pub punto: i32,
    /// Free-text note.
    pub observacion: Option<String>,
    /// Order lines.
    pub items: Vec<CompraItemRequest>,
}

/// POST `/ordenes-compra` - Create an internal purchase order (ABIERTO).
async fn create_orden(
    State(state): State<AppState>,
    Json(body): Json<CreateOrdenRequest>,
) -> impl IntoResponse {
    let repo = CompraRepository::new(state.db.clone());
    let input = CreateOrdenCompraInput {
        proveedor_id: body.proveedor_id,
        fecha: body.fecha,
        punto: body.punto,
        observacion: body.observacion,
        items: body.items.into_iter().map(CompraItemRequest::into_input).collect(),
    };
    match repo.crear_orden(input).await {
        Ok(orden) => (StatusCode::CREATED, Json(json!(orden))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// POST `/ordenes-compra/{id}/cerrar` - Close an open order.
async fn cerrar_orden(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = CompraRepository::new(state.db.clone());
    match repo.cerrar_orden(id).await {
        Ok(orden) => (StatusCode::OK, Json(json!(orden))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}
