//! FerreDesk API Server
//!
//! Main entry point for the FerreDesk backend service.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ferredesk_api::services::AutoridadArca;
use ferredesk_api::{AppState, create_router};
use ferredesk_arca::ArcaClient;
use ferredesk_db::repositories::{FormLockRepository, ReservaRepository};
use ferredesk_db::{AutoridadFiscal, connect};
use ferredesk_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ferredesk=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(AppConfig::load().expect("Failed to load configuration"));

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Fiscal authority client, only when emission is enabled
    let autoridad: Option<Arc<dyn AutoridadFiscal>> = if config.arca.habilitado {
        let cliente = ArcaClient::new(&config.arca)?;
        info!(modo = ?config.arca.modo, "Fiscal emission enabled");
        Some(Arc::new(AutoridadArca(Arc::new(cliente))))
    } else {
        warn!("Fiscal emission disabled; fiscal document types will be rejected");
        None
    };

    // Periodic sweeper for expired reservations and form locks
    let reservas = ReservaRepository::new(db.clone());
    let locks = FormLockRepository::new(db.clone());
    let barrido = Duration::from_secs(config.reservas.barrido_segundos);
    tokio::spawn(async move {
        let mut intervalo = tokio::time::interval(barrido);
        loop {
            intervalo.tick().await;
            match reservas.barrer_expiradas().await {
                Ok(n) if n > 0 => info!(expiradas = n, "reservas expiradas barridas"),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "barrido de reservas falló"),
            }
            match locks.barrer_expirados().await {
                Ok(n) if n > 0 => info!(purgados = n, "locks expirados purgados"),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "barrido de locks falló"),
            }
        }
    });

    // Create application state
    let state = AppState {
        db,
        config: config.clone(),
        autoridad,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
