//! Health check endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use sea_orm::{ConnectionTrait, Statement};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Whether the database answered a ping.
    pub database: bool,
    /// Whether fiscal emission is wired to ARCA.
    pub emision_fiscal: bool,
}

/// Health check handler. Pings the database; a failed ping degrades the
/// status without failing the request.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state
        .db
        .execute(Statement::from_string(
            state.db.get_database_backend(),
            "SELECT 1",
        ))
        .await
        .is_ok();

    Json(HealthResponse {
        status: if database { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
        emision_fiscal: state.autoridad.is_some(),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
