//! Caja routes: register sessions, orden de pago egresos and the cheque
//! lifecycle.

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

use ferredesk_db::CajaRepository;
use ferredesk_db::repositories::CreateChequeInput;
use ferredesk_shared::error::AppError;

use crate::AppState;
use crate::routes::respuesta_error;

/// Creates the caja routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/caja/sesiones", post(abrir_sesion))
        .route("/caja/sesiones/{id}/cerrar", post(cerrar_sesion))
        .route("/caja/sesiones/{id}/egresos", post(registrar_egreso))
        .route("/cheques", post(registrar_cheque))
        .route("/cheques/{id}/endosar", post(endosar_cheque))
        .route("/cheques/{id}/depositar", post(depositar_cheque))
        .route("/cheques/{id}/cobrar", post(cobrar_cheque))
        .route("/cheques/{id}/rechazar", post(rechazar_cheque))
}

/// Request body for opening a register session.
#[derive(Debug, Deserialize)]
pub struct AbrirSesionRequest {
    /// Operator opening the register.
    pub usuario: String,
    /// Counted opening balance.
    pub saldo_inicial: Decimal,
}

/// POST `/caja/sesiones` - Open a register session.
async fn abrir_sesion(
    State(state): State<AppState>,
    Json(body): Json<AbrirSesionRequest>,
) -> impl IntoResponse {
    let repo = CajaRepository::new(state.db.clone());
    match repo.abrir_sesion(&body.usuario, body.saldo_inicial).await {
        Ok(sesion) => (StatusCode::CREATED, Json(json!(sesion))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for closing a register session.
#[derive(Debug, Deserialize)]
pub struct CerrarSesionRequest {
    /// Counted closing balance.
    pub saldo_cierre: Decimal,
}

/// POST `/caja/sesiones/{id}/cerrar` - Close a register session.
async fn cerrar_sesion(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<CerrarSesionRequest>,
) -> impl IntoResponse {
    let repo = CajaRepository::new(state.db.clone());
    match repo.cerrar_sesion(id, body.saldo_cierre).await {
        Ok(sesion) => (StatusCode::OK, Json(json!(sesion))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for an orden de pago cash egreso.
#[derive(Debug, Deserialize)]
pub struct EgresoRequest {
    /// Orden de pago whose cash leg is being paid out.
    pub orden_pago_id: i32,
    /// Movement description.
    pub concepto: String,
    /// Cash amount handed over.
    pub monto: Decimal,
}

/// POST `/caja/sesiones/{id}/egresos` - Record an orden de pago cash leg.
async fn registrar_egreso(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<EgresoRequest>,
) -> impl IntoResponse {
    let repo = CajaRepository::new(state.db.clone());
    match repo
        .registrar_egreso_orden_pago(id, body.orden_pago_id, &body.concepto, body.monto)
        .await
    {
        Ok(movimiento) => (StatusCode::CREATED, Json(json!(movimiento))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for registering a received cheque.
#[derive(Debug, Deserialize)]
pub struct CreateChequeRequest {
    /// Cheque number as printed.
    pub numero: String,
    /// Issuing bank.
    pub banco: String,
    /// Face amount.
    pub importe: Decimal,
    /// Issue date.
    pub fecha_emision: NaiveDate,
    /// Customer who handed the cheque over.
    pub cliente_id: Option<i32>,
}

/// POST `/cheques` - Register a cheque received from a client.
async fn registrar_cheque(
    State(state): State<AppState>,
    Json(body): Json<CreateChequeRequest>,
) -> impl IntoResponse {
    let repo = CajaRepository::new(state.db.clone());
    let input = CreateChequeInput {
        numero: body.numero,
        banco: body.banco,
        importe: body.importe,
        fecha_emision: body.fecha_emision,
        cliente_id: body.cliente_id,
    };
    match repo.registrar_cheque(input).await {
        Ok(cheque) => (StatusCode::CREATED, Json(json!(cheque))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for endorsing a cheque.
#[derive(Debug, Deserialize)]
pub struct EndosarRequest {
    /// Who receives the cheque: "proveedor", "cliente" or a named person.
    pub endosado_a: String,
    /// Supplier the endorsement pays, when applicable.
    pub proveedor_id: Option<i32>,
}

/// POST `/cheques/{id}/endosar` - Endorse a cheque in portfolio.
async fn endosar_cheque(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<EndosarRequest>,
) -> impl IntoResponse {
    let repo = CajaRepository::new(state.db.clone());
    match repo.endosar_cheque(id, &body.endosado_a, body.proveedor_id).await {
        Ok(cheque) => (StatusCode::OK, Json(json!(cheque))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// POST `/cheques/{id}/depositar` - Deposit a cheque in portfolio.
async fn depositar_cheque(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    let repo = CajaRepository::new(state.db.clone());
    match repo.depositar_cheque(id).await {
        Ok(cheque) => (StatusCode::OK, Json(json!(cheque))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for marking a deposited cheque collected.
#[derive(Debug, Deserialize)]
pub struct CobrarRequest {
    /// Date the funds cleared.
    pub fecha_cobro: NaiveDate,
}

/// POST `/cheques/{id}/cobrar` - Mark a deposited cheque as collected.
async fn cobrar_cheque(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<CobrarRequest>,
) -> impl IntoResponse {
    let repo = CajaRepository::new(state.db.clone());
    match repo.cobrar_cheque(id, body.fecha_cobro).await {
        Ok(cheque) => (StatusCode::OK, Json(json!(cheque))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for bouncing a cheque.
#[derive(Debug, Deserialize)]
pub struct RechazarRequest {
    /// Debit note raised against the issuer, when one exists.
    pub nota_debito_id: Option<i32>,
}

/// POST `/cheques/{id}/rechazar` - Mark a cheque as bounced.
async fn rechazar_cheque(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<RechazarRequest>,
) -> impl IntoResponse {
    let repo = CajaRepository::new(state.db.clone());
    match repo.rechazar_cheque(id, body.nota_debito_id).await {
        Ok(cheque) => (StatusCode::OK, Json(json!(cheque))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}
