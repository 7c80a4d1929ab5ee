//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// ARCA (AFIP) fiscal services configuration.
    pub arca: ArcaConfig,
    /// Stock reservation configuration.
    #[serde(default)]
    pub reservas: ReservasConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// ARCA environment: homologation (test) or production endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ModoArca {
    /// Homologation (test) endpoints.
    Hom,
    /// Production endpoints.
    Prod,
}

/// ARCA (AFIP) fiscal services configuration.
///
/// The certificate and key paths point to the ferretería's X.509 material
/// used to sign WSAA login tickets.
#[derive(Debug, Clone, Deserialize)]
pub struct ArcaConfig {
    /// Whether fiscal emission is enabled at all.
    #[serde(default)]
    pub habilitado: bool,
    /// Environment selection.
    #[serde(default = "default_modo")]
    pub modo: ModoArca,
    /// Path to the PEM-encoded X.509 certificate.
    pub certificado: String,
    /// Path to the PEM-encoded private key.
    pub clave_privada: String,
    /// Wall-time upper bound for a single SOAP call, in seconds.
    #[serde(default = "default_arca_timeout")]
    pub timeout_segundos: u64,
}

fn default_modo() -> ModoArca {
    ModoArca::Hom
}

fn default_arca_timeout() -> u64 {
    30
}

/// Stock reservation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservasConfig {
    /// Minutes a cart hold stays active before the sweeper expires it.
    #[serde(default = "default_ttl_minutos")]
    pub ttl_minutos: i64,
    /// Seconds between sweeper runs (reservations and form locks).
    #[serde(default = "default_sweep_segundos")]
    pub barrido_segundos: u64,
}

fn default_ttl_minutos() -> i64 {
    30
}

fn default_sweep_segundos() -> u64 {
    60
}

impl Default for ReservasConfig {
    fn default() -> Self {
        Self {
            ttl_minutos: default_ttl_minutos(),
            barrido_segundos: default_sweep_segundos(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FERREDESK").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
