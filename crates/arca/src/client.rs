//! High-level client over WSAA + WSFEv1.

use std::time::Duration;

use ferredesk_core::arca::PayloadArca;
use ferredesk_shared::config::ArcaConfig;

use crate::error::ArcaError;
use crate::wsaa::Wsaa;
use crate::wsfe::{self, RespuestaCae};

/// Service name the tickets are requested for.
const SERVICIO_WSFE: &str = "wsfe";

/// SOAP client for the fiscal authority, safe to share behind an `Arc`.
pub struct ArcaClient {
    http: reqwest::Client,
    wsaa: Wsaa,
    endpoint_wsfe: &'static str,
}

impl ArcaClient {
    /// Builds the client from the fiscal configuration, loading the PEM
    /// credentials from the configured paths.
    ///
    /// # Errors
    ///
    /// Fails when the certificate or key files cannot be read, or the
    /// HTTP client cannot be constructed.
    pub fn new(config: &ArcaConfig) -> Result<Self, ArcaError> {
        let certificado = std::fs::read_to_string(&config.certificado).map_err(|e| {
            ArcaError::Credenciales(format!("certificado '{}': {e}", config.certificado))
        })?;
        let clave_privada = std::fs::read_to_string(&config.clave_privada).map_err(|e| {
            ArcaError::Credenciales(format!("clave privada '{}': {e}", config.clave_privada))
        })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_segundos))
            .build()
            .map_err(|e| ArcaError::Transporte(format!("cliente HTTP: {e}")))?;

        Ok(Self {
            wsaa: Wsaa::new(http.clone(), config.modo, certificado, clave_privada),
            endpoint_wsfe: wsfe::endpoint(config.modo),
            http,
        })
    }

    /// Requests a CAE for one document.
    ///
    /// # Errors
    ///
    /// `Rechazo` carries the authority's errors verbatim; `Transporte`
    /// means the outcome is indeterminate and the caller must reconcile
    /// with [`Self::ultimo_autorizado`] before retrying.
    pub async fn solicitar_cae(
        &self,
        pto_vta: u32,
        cbte_tipo: u32,
        payload: &PayloadArca,
    ) -> Result<RespuestaCae, ArcaError> {
        let cred = self.wsaa.credencial(SERVICIO_WSFE).await?;
        wsfe::solicitar_cae(&self.http, self.endpoint_wsfe, &cred, pto_vta, cbte_tipo, payload)
            .await
    }

    /// Queries the last authorized number for (type, point of sale).
    ///
    /// # Errors
    ///
    /// Propagates authentication and transport failures.
    pub async fn ultimo_autorizado(&self, pto_vta: u32, cbte_tipo: u32) -> Result<u64, ArcaError> {
        let cred = self.wsaa.credencial(SERVICIO_WSFE).await?;
        wsfe::ultimo_autorizado(&self.http, self.endpoint_wsfe, &cred, pto_vta, cbte_tipo).await
    }
}
