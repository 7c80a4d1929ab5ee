//! Application-wide error taxonomy.
//!
//! Internal boundaries raise module-level `thiserror` enums; those convert
//! into `AppError` before crossing the API edge, where the variant decides
//! the HTTP status and a stable machine-readable code.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad input: missing CUIT for a Factura A, orphan nota, negative
    /// quantities, reservation over available stock, and the like.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another session holds the resource (form lock busy, numbering race).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unknown document, customer or product.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transition not allowed for the document's current state.
    #[error("State error: {0}")]
    State(String),

    /// Uniqueness violation (duplicate CUIT, duplicate invoice per proveedor).
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// WSAA failure: bad certificate, clock skew, network to WSAA.
    #[error("ARCA authentication error: {0}")]
    ArcaAuth(String),

    /// WSFEv1 returned Resultado "R"; carries the AFIP error list verbatim.
    #[error("ARCA rejected the request: {0}")]
    ArcaReject(String),

    /// Indeterminate outcome; the caller must reconcile against
    /// `FECompUltimoAutorizado` before retrying.
    #[error("ARCA transport error: {0}")]
    ArcaTransport(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Conflict(_) | Self::Integrity(_) => 409,
            Self::State(_) | Self::ArcaReject(_) => 422,
            Self::ArcaAuth(_) => 502,
            Self::ArcaTransport(_) => 504,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::State(_) => "STATE_ERROR",
            Self::Integrity(_) => "INTEGRITY_ERROR",
            Self::ArcaAuth(_) => "ARCA_AUTH_ERROR",
            Self::ArcaReject(_) => "ARCA_REJECT",
            Self::ArcaTransport(_) => "ARCA_TRANSPORT_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the caller must run the fiscal reconciliation path before
    /// retrying (the previous invoice number may have been consumed).
    #[must_use]
    pub const fn requires_reconciliation(&self) -> bool {
        matches!(self, Self::ArcaTransport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(AppError::Conflict(String::new()).status_code(), 409);
        assert_eq!(AppError::Integrity(String::new()).status_code(), 409);
        assert_eq!(AppError::State(String::new()).status_code(), 422);
        assert_eq!(AppError::ArcaReject(String::new()).status_code(), 422);
        assert_eq!(AppError::ArcaAuth(String::new()).status_code(), 502);
        assert_eq!(AppError::ArcaTransport(String::new()).status_code(), 504);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(AppError::State(String::new()).error_code(), "STATE_ERROR");
        assert_eq!(
            AppError::Integrity(String::new()).error_code(),
            "INTEGRITY_ERROR"
        );
        assert_eq!(
            AppError::ArcaReject(String::new()).error_code(),
            "ARCA_REJECT"
        );
    }

    #[test]
    fn test_only_transport_requires_reconciliation() {
        assert!(AppError::ArcaTransport(String::new()).requires_reconciliation());
        assert!(!AppError::ArcaReject(String::new()).requires_reconciliation());
        assert!(!AppError::ArcaAuth(String::new()).requires_reconciliation());
        assert!(!AppError::Validation(String::new()).requires_reconciliation());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::ArcaTransport("timeout".into()).to_string(),
            "ARCA transport error: timeout"
        );
    }
}
