//! Stock reservation routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use ferredesk_db::ReservaRepository;
use ferredesk_db::repositories::CreateReservaInput;
use ferredesk_shared::error::AppError;

use crate::AppState;
use crate::routes::respuesta_error;

/// Creates the reservation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reservas", post(create_reserva))
        .route("/reservas/confirmar", post(confirmar_reservas))
        .route("/reservas/cancelar", post(cancelar_reservas))
}

/// Request body for creating a reservation.
#[derive(Debug, Deserialize)]
pub struct CreateReservaRequest {
    /// Product id.
    pub stock_id: i32,
    /// Supplier the stock is drawn from.
    pub proveedor_id: i32,
    /// Quantity to hold.
    pub cantidad: Decimal,
    /// Operator holding the cart.
    pub usuario: String,
    /// Cart session; one session groups the holds of one cart.
    pub sesion: Uuid,
}

/// POST `/reservas` - Hold stock for a cart.
async fn create_reserva(
    State(state): State<AppState>,
    Json(body): Json<CreateReservaRequest>,
) -> impl IntoResponse {
    let repo = ReservaRepository::new(state.db.clone());
    let input = CreateReservaInput {
        stock_id: body.stock_id,
        proveedor_id: body.proveedor_id,
        cantidad: body.cantidad,
        usuario: body.usuario,
        sesion: body.sesion,
        ttl_minutos: state.config.reservas.ttl_minutos,
    };
    match repo.crear(input).await {
        Ok(reserva) => (StatusCode::CREATED, Json(json!(reserva))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for confirming a cart's reservations.
#[derive(Debug, Deserialize)]
pub struct ConfirmarRequest {
    /// Cart session holding the reservations.
    pub sesion: Uuid,
    /// Venta consuming the stock.
    pub venta_id: i32,
}

/// POST `/reservas/confirmar` - Consume a cart's holds into a venta.
async fn confirmar_reservas(
    State(state): State<AppState>,
    Json(body): Json<ConfirmarRequest>,
) -> impl IntoResponse {
    let repo = ReservaRepository::new(state.db.clone());
    match repo.confirmar(body.sesion, body.venta_id).await {
        Ok(confirmadas) => {
            (StatusCode::OK, Json(json!({ "confirmadas": confirmadas }))).into_response()
        }
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for cancelling a cart's reservations.
#[derive(Debug, Deserialize)]
pub struct CancelarRequest {
    /// Cart session holding the reservations.
    pub sesion: Uuid,
}

/// POST `/reservas/cancelar` - Release a cart's holds.
async fn cancelar_reservas(
    State(state): State<AppState>,
    Json(body): Json<CancelarRequest>,
) -> impl IntoResponse {
    let repo = ReservaRepository::new(state.db.clone());
    match repo.cancelar(body.sesion).await {
        Ok(canceladas) => {
            (StatusCode::OK, Json(json!({ "canceladas": canceladas }))).into_response()
        }
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}
