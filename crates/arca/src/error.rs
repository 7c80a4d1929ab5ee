//! Error types for the ARCA client.

use ferredesk_shared::error::AppError;
use thiserror::Error;

/// One `Err` or `Obs` element returned by WSFEv1, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventoArca {
    pub codigo: String,
    pub mensaje: String,
}

impl std::fmt::Display for EventoArca {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.codigo, self.mensaje)
    }
}

#[derive(Debug, Error)]
pub enum ArcaError {
    /// Certificate or private key could not be loaded or used.
    #[error("credenciales fiscales inválidas: {0}")]
    Credenciales(String),

    /// WSAA refused the login ticket (expired, skewed clock, bad CMS).
    #[error("autenticación WSAA fallida: {0}")]
    Auth(String),

    /// WSFEv1 answered `Resultado = "R"`. Errors and observations are
    /// carried verbatim for the operator.
    #[error("comprobante rechazado por ARCA: {}", mensaje_rechazo(.errores, .observaciones))]
    Rechazo {
        errores: Vec<EventoArca>,
        observaciones: Vec<EventoArca>,
    },

    /// Timeout or network failure. The emission is indeterminate and the
    /// caller must reconcile against `FECompUltimoAutorizado` before retry.
    #[error("transporte ARCA: {0}")]
    Transporte(String),

    /// The response arrived but could not be interpreted. Treated as
    /// indeterminate, same as a transport failure.
    #[error("respuesta ARCA inesperada: {0}")]
    RespuestaInvalida(String),
}

fn mensaje_rechazo(errores: &[EventoArca], observaciones: &[EventoArca]) -> String {
    errores
        .iter()
        .chain(observaciones.iter())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<reqwest::Error> for ArcaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Transporte(format!("timeout: {err}"))
        } else {
            Self::Transporte(err.to_string())
        }
    }
}

impl From<ArcaError> for AppError {
    fn from(err: ArcaError) -> Self {
        match err {
            ArcaError::Credenciales(_) | ArcaError::Auth(_) => Self::ArcaAuth(err.to_string()),
            ArcaError::Rechazo { .. } => Self::ArcaReject(err.to_string()),
            ArcaError::Transporte(_) | ArcaError::RespuestaInvalida(_) => {
                Self::ArcaTransport(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rechazo_carries_codes_verbatim() {
        let err = ArcaError::Rechazo {
            errores: vec![EventoArca {
                codigo: "10016".into(),
                mensaje: "Campo CbteDesde invalido".into(),
            }],
            observaciones: vec![EventoArca {
                codigo: "10048".into(),
                mensaje: "Condicion IVA receptor".into(),
            }],
        };
        let texto = err.to_string();
        assert!(texto.contains("[10016] Campo CbteDesde invalido"));
        assert!(texto.contains("[10048] Condicion IVA receptor"));
    }

    #[test]
    fn test_mapping_to_app_error() {
        let app: AppError = ArcaError::Auth("ticket vencido".into()).into();
        assert_eq!(app.status_code(), 502);

        let app: AppError = ArcaError::Transporte("timeout".into()).into();
        assert_eq!(app.status_code(), 504);
        assert!(app.requires_reconciliation());

        let app: AppError = ArcaError::Rechazo {
            errores: vec![],
            observaciones: vec![],
        }
        .into();
        assert_eq!(app.status_code(), 422);
    }
}
