//! Form lock routes: exclusive editing rights over shared sales forms.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use ferredesk_db::FormLockRepository;
use ferredesk_shared::error::AppError;

use crate::AppState;
use crate::routes::respuesta_error;

/// How long a freshly acquired lock lives before the sweeper may purge it.
const TTL_LOCK_MINUTOS: i64 = 15;

/// Creates the form lock routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/locks", post(create_lock))
        .route("/locks/renovar", post(renovar_lock))
        .route("/locks/liberar", post(liberar_lock))
}

/// Request body for acquiring a lock.
#[derive(Debug, Deserialize)]
pub struct CreateLockRequest {
    /// Lock slot ("venta", "presupuesto", "conversion").
    pub tipo: String,
    /// Operator requesting the lock.
    pub usuario: String,
    /// Editing session; re-acquiring under the same session renews.
    pub sesion: Uuid,
    /// Target quote, required for `tipo = "conversion"`.
    pub presupuesto_id: Option<i32>,
}

/// POST `/locks` - Acquire (or renew) an editing lock.
async fn create_lock(
    State(state): State<AppState>,
    Json(body): Json<CreateLockRequest>,
) -> impl IntoResponse {
    let repo = FormLockRepository::new(state.db.clone());
    match repo
        .adquirir(
            &body.tipo,
            &body.usuario,
            body.sesion,
            body.presupuesto_id,
            TTL_LOCK_MINUTOS,
        )
        .await
    {
        Ok(lock) => (StatusCode::CREATED, Json(json!(lock))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// Request body for renewing or releasing a lock.
#[derive(Debug, Deserialize)]
pub struct TouchLockRequest {
    /// Lock id.
    pub lock_id: i32,
    /// Owning session.
    pub sesion: Uuid,
}

/// POST `/locks/renovar` - Extend a held lock.
async fn renovar_lock(
    State(state): State<AppState>,
    Json(body): Json<TouchLockRequest>,
) -> impl IntoResponse {
    let repo = FormLockRepository::new(state.db.clone());
    match repo.renovar(body.lock_id, body.sesion, TTL_LOCK_MINUTOS).await {
        Ok(lock) => (StatusCode::OK, Json(json!(lock))).into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}

/// POST `/locks/liberar` - Release a held lock.
async fn liberar_lock(
    State(state): State<AppState>,
    Json(body): Json<TouchLockRequest>,
) -> impl IntoResponse {
    let repo = FormLockRepository::new(state.db.clone());
    match repo.liberar(body.lock_id, body.sesion).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => respuesta_error(&AppError::from(err)).into_response(),
    }
}
