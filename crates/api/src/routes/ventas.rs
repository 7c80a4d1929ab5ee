//! Sales document routes: emission, anulación, conversion and the
//! calculated projection.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use ferredesk_db::VentaRepository;
use ferredesk_db::repositories::{CreateVentaInput, CreateVentaItemInput};
use ferredesk_shared::error::AppError;

use crate::AppState;
use crate::routes::respuesta_error;
use crate::services::{EmisionInput, PagoInput, VentasService, ventas::hoy};

/// Creates the ventas routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ventas", post(create_venta))
        .route("/ventas/{id}/anular", post(anular_venta))
        .route("/ventas/convertir/{presupuesto_id}", post(convertir_presupuesto))
        .route("/ventas/calculado", get(venta_calculada))
}

/// One line of the request body.
#[derive(Debug, Deserialize)]
pub struct VentaItemRequest {
    /// Line order within the document.
    pub orden: i32,
    /// Product id, absent for free-text lines.
    pub idsto: Option<i32>,
    /// Supplier the stock is drawn from.
    pub idpro: Option<i32>,
    /// Quantity.
    pub cantidad: Decimal,
    /// Unit cost snapshot.
    pub costo: Decimal,
    /// Margin percentage.
    pub margen: Decimal,
    /// Line bonification percentage.
    #[serde(default)]
    pub bonifica: Decimal,
    /// Line description.
    pub detalle1: String,
    /// Secondary description.
    pub detalle2: Option<String>,
    /// IVA rate id.
    pub idaliiva: i32,
    /// Manual final unit price; overrides cost+margin when present.
    pub precio_unitario_final: Option<Decimal>,
}

/// Request body for emitting a sales document.
#[derive(Debug, Deserialize)]
pub struct CreateVentaRequest {
    /// AFIP code of the comprobante ("001", "006", "9997", ...).
    pub comprobante_codigo_afip: String,
    /// Point of sale.
    pub punto: i32,
    /// Issue date; defaults to today.
    pub fecha: Option<NaiveDate>,
    /// Customer, absent for consumidor final counter sales.
    pub cliente_id: Option<i32>,
    /// Cascade discount 1, percentage.
    #[serde(default)]
    pub descu1: Decimal,
    /// Cascade discount 2, percentage.
    #[serde(default)]
    pub descu2: Decimal,
    /// Cascade discount 3, percentage.
    #[serde(default)]
    pub descu3: Decimal,
    /// Closing rounding adjustment, absolute.
    #[serde(default)]
    pub descuento_cierre: Decimal,
    /// General bonification percentage applied to lines without their own.
    #[serde(default)]
    pub bonificacion_general: Decimal,
    /// Free-text note.
    pub observacion: Option<String>,
    /// Payment due date.
    pub vencimiento: Option<NaiveDate>,
    /// Facturas affected; required for notas.
    #[serde(default)]
    pub facturas_asociadas: Vec<i32>,
    /// Document lines.
    pub items: Vec<VentaItemRequest>,
    /// Operator issuing the document.
    pub usuario: String,
    /// Cart session already holding reservations.
    pub reserva_sesion: Option<Uuid>,
    /// Payment legs for point-of-sale completion.
    #[serde(default)]
    pub pagos: Vec<PagoInput>,
    /// Open register session; required when `pagos` is non-empty.
    pub sesion_caja_id: Option<i32>,
}

impl CreateVentaRequest {
    fn into_emision(self) -> EmisionInput {
        EmisionInput {
            venta: CreateVentaInput {
                comprobante_codigo_afip: self.comprobante_codigo_afip,
                punto: self.punto,
                fecha: self.fecha.unwrap_or_else(hoy),
                cliente_id: self.cliente_id,
                descu1: self.descu1,
                descu2: self.descu2,
                descu3: self.descu3,
                descuento_cierre: self.descuento_cierre,
                bonificacion_general: self.bonificacion_general,
                observacion: self.observacion,
                vencimiento: self.vencimiento,
                facturas_asociadas: self.facturas_asociadas,
                items: self
                    .items
                    .into_iter()
                    .map(|item| CreateVentaItemInput {
                        orden: item.orden,
                        idsto: item.idsto,
                        idpro: item.idpro,
                        cantidad: item.cantidad,
                        costo: item.costo,
                        margen: item.margen,
                        bonifica: item.bonifica,
                        detalle1: item.detalle1,
                        detalle2: item.detalle2,
                        idaliiva: item.idaliiva,
                        precio_unitario_final: item.precio_unitario_final,
                    })
                    .collect(),
            },
            usuario: self.usuario,
            reserva_sesion: self.reserva_sesion,
            pagos: self.pagos,
            sesion_caja_id: self.sesion_caja_id,
        }
    }
}

/// POST `/ventas` - Emit a sales document end to end.
async fn create_venta(
    State(state): State<AppState>,
    Json(body): Json<CreateVentaRequest>,
) -> impl IntoResponse {
    let service = VentasService::new(
        state.db.clone(),
        state.autoridad.clone(),
        state.config.reservas.ttl_minutos,
    );
    match service.emitir(body.into_emision()).await {
        Ok(emitida) => (StatusCode::CREATED, Json(json!(emitida))).into_response(),
        Err(err) => respuesta_error(&err).into_response(),
    }
}

/// POST `/ventas/{id}/anular` - Void a document (AB -> AN).
async fn anular_venta(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = VentaRepository::new(state.db.clone());
    match repo.anular(id).await {
        Ok(venta) => (StatusCode::OK, Json(json!(venta))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for converting a presupuesto.
#[derive(Debug, Deserialize)]
pub struct ConvertirRequest {
    /// Target comprobante AFIP code.
    pub comprobante_codigo_afip: String,
    /// Operator performing the conversion.
    pub usuario: String,
    /// Editing session; the conversion lock is taken under it.
    pub sesion: Uuid,
}

/// POST `/ventas/convertir/{presupuesto_id}` - Convert a quote into a
/// fiscal (or internal) document under the conversion lock.
async fn convertir_presupuesto(
    State(state): State<AppState>,
    Path(presupuesto_id): Path<i32>,
    Json(body): Json<ConvertirRequest>,
) -> impl IntoResponse {
    let service = VentasService::new(
        state.db.clone(),
        state.autoridad.clone(),
        state.config.reservas.ttl_minutos,
    );
    match service
        .convertir(
            presupuesto_id,
            &body.comprobante_codigo_afip,
            &body.usuario,
            body.sesion,
        )
        .await
    {
        Ok(emitida) => (StatusCode::CREATED, Json(json!(emitida))).into_response(),
        Err(err) => respuesta_error(&err).into_response(),
    }
}

/// Query parameters for the calculated projection.
#[derive(Debug, Deserialize)]
pub struct CalculadoQuery {
    /// Venta id to project.
    pub ven_id: i32,
}

/// GET `/ventas/calculado?ven_id=` - Venta with all derived fields.
async fn venta_calculada(
    State(state): State<AppState>,
    Query(query): Query<CalculadoQuery>,
) -> impl IntoResponse {
    let repo = VentaRepository::new(state.db.clone());
    match repo.calculada(query.ven_id).await {
        Ok(calculada) => (
            StatusCode::OK,
            Json(json!({
                "venta": calculada.venta,
                "items": calculada.items,
                "numero_formateado": calculada.numero_formateado,
                "calculo": calculada.calculo,
            })),
        )
            .into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}
