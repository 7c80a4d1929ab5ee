//! API route definitions.

use axum::Json;
use axum::http::StatusCode;
use serde_json::json;

use ferredesk_shared::error::AppError;

use crate::AppState;

pub mod caja;
pub mod compras;
pub mod cuenta_corriente;
pub mod health;
pub mod listas_precio;
pub mod locks;
pub mod reservas;
pub mod ventas;

/// Creates the API router with all routes.
pub fn api_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .merge(health::routes())
        .merge(ventas::routes())
        .merge(cuenta_corriente::routes())
        .merge(reservas::routes())
        .merge(locks::routes())
        .merge(listas_precio::routes())
        .merge(compras::routes())
        .merge(caja::routes())
}

/// Renders an [`AppError`] as the standard error body. 504 additionally
/// carries `requires_reconciliation` so a client knows to re-query the
/// authority before retrying.
pub(crate) fn respuesta_error(err: &AppError) -> (StatusCode, Json<serde_json::Value>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut body = json!({
        "error": err.error_code(),
        "message": err.to_string(),
    });
    if err.requires_reconciliation() {
        body["requires_reconciliation"] = json!(true);
    }
    (status, Json(body))
}
