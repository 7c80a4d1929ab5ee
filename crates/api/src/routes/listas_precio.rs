//! Price list routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::patch,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use ferredesk_db::ListaPrecioRepository;
use ferredesk_shared::error::AppError;

use crate::AppState;
use crate::routes::respuesta_error;

/// Creates the price list routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/listas-precio/{numero}", patch(recalcular_lista))
}

/// Request body for a list-margin change.
#[derive(Debug, Deserialize)]
pub struct RecalcularRequest {
    /// Signed percentage over list 0 (negative = discount).
    pub margen_descuento: Decimal,
    /// Operator applying the change, recorded with the recalculation.
    pub usuario: Option<String>,
}

/// PATCH `/listas-precio/{numero}` - Change a derived list's margin and
/// recalculate its stored prices.
async fn recalcular_lista(
    State(state): State<AppState>,
    Path(numero): Path<u8>,
    Json(body): Json<RecalcularRequest>,
) -> impl IntoResponse {
    let repo = ListaPrecioRepository::new(state.db.clone());
    match repo
        .recalcular(numero, body.margen_descuento, body.usuario.as_deref())
        .await
    {
        Ok(resumen) => (
            StatusCode::OK,
            Json(json!({
                "recalculo": {
                    "productos_recalculados": resumen.recalculados,
                    "productos_manuales_no_recalculados": resumen.manuales_omitidos,
                }
            })),
        )
            .into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}
