//! HTTP API layer with Axum routes and the sales submission service.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - The sales submission orchestrator (reservations, numbering, CAE, caja)
//! - The adapter binding the SOAP client to the fiscal-authority seam

pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::Router;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ferredesk_db::AutoridadFiscal;
use ferredesk_shared::config::AppConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,
    /// Loaded application configuration.
    pub config: Arc<AppConfig>,
    /// Fiscal authority adapter; `None` when emission is disabled, in which
    /// case fiscal document types are rejected at the service boundary.
    pub autoridad: Option<Arc<dyn AutoridadFiscal>>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
