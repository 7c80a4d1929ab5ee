//! Cuenta corriente routes: customer and supplier movement streams.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use ferredesk_core::cc::MovimientoCc;
use ferredesk_db::CuentaCorrienteRepository;
use ferredesk_shared::error::AppError;

use crate::AppState;
use crate::routes::respuesta_error;

/// Creates the cuenta corriente routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cuenta-corriente/cliente/{id}", get(stream_cliente))
        .route("/cuenta-corriente/proveedor/{id}", get(stream_proveedor))
}

/// Query parameters for a movement stream.
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Include fully-closed documents (default: only open ones).
    #[serde(default)]
    pub completo: bool,
    /// Window start, inclusive.
    pub desde: Option<NaiveDate>,
    /// Window end, inclusive.
    pub hasta: Option<NaiveDate>,
}

/// Running balances are computed over the whole history first; the date
/// window only trims what is shown.
fn ventana(movimientos: Vec<MovimientoCc>, query: &StreamQuery) -> Vec<MovimientoCc> {
    movimientos
        .into_iter()
        .filter(|m| query.desde.is_none_or(|d| m.fecha >= d))
        .filter(|m| query.hasta.is_none_or(|h| m.fecha <= h))
        .collect()
}

/// GET `/cuenta-corriente/cliente/{id}` - Customer ledger stream.
async fn stream_cliente(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<StreamQuery>,
) -> impl IntoResponse {
    let repo = CuentaCorrienteRepository::new(state.db.clone());
    match repo.cliente(id, query.completo).await {
        Ok(movimientos) => {
            (StatusCode::OK, Json(json!(ventana(movimientos, &query)))).into_response()
        }
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// GET `/cuenta-corriente/proveedor/{id}` - Supplier ledger stream.
async fn stream_proveedor(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<StreamQuery>,
) -> impl IntoResponse {
    let repo = CuentaCorrienteRepository::new(state.db.clone());
    match repo.proveedor(id, query.completo).await {
        Ok(movimientos) => {
            (StatusCode::OK, Json(json!(ventana(movimientos, &query)))).into_response()
        }
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}
