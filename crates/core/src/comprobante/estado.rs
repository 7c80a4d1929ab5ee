//! Sales document state machine.
//!
//! A venta moves `AB` (open/issued) -> `AN` (voided). Presupuestos
//! additionally support conversion into a fiscal factura, tracked through
//! the conversion fields rather than a distinct estado.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::tipos::TipoComprobante;

/// Sales document state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoVenta {
    /// Open / issued.
    #[serde(rename = "AB")]
    Abierto,
    /// Voided.
    #[serde(rename = "AN")]
    Anulado,
}

impl EstadoVenta {
    /// Database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Abierto => "AB",
            Self::Anulado => "AN",
        }
    }
}

impl std::str::FromStr for EstadoVenta {
    type Err = EstadoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AB" => Ok(Self::Abierto),
            "AN" => Ok(Self::Anulado),
            other => Err(EstadoError::UnknownEstado(other.to_string())),
        }
    }
}

/// State transition errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EstadoError {
    /// Unknown estado string in storage.
    #[error("Unknown venta estado: {0}")]
    UnknownEstado(String),

    /// Voided documents cannot change.
    #[error("Cannot modify a voided document")]
    Anulado,

    /// Already voided.
    #[error("Document is already voided")]
    YaAnulado,

    /// The quote was already converted to a fiscal document.
    #[error("Presupuesto was already converted to a fiscal document")]
    YaConvertido,

    /// Only presupuestos can be converted.
    #[error("Only presupuestos can be converted, got {0}")]
    NoEsPresupuesto(TipoComprobante),
}

/// Validates that a document can be modified.
///
/// # Errors
///
/// Returns an error for voided documents.
pub fn puede_modificar(estado: EstadoVenta) -> Result<(), EstadoError> {
    match estado {
        EstadoVenta::Abierto => Ok(()),
        EstadoVenta::Anulado => Err(EstadoError::Anulado),
    }
}

/// Validates the AB -> AN transition.
///
/// # Errors
///
/// Returns an error when the document is already voided.
pub fn puede_anular(estado: EstadoVenta) -> Result<(), EstadoError> {
    match estado {
        EstadoVenta::Abierto => Ok(()),
        EstadoVenta::Anulado => Err(EstadoError::YaAnulado),
    }
}

/// Validates that a quote can still be converted to a fiscal factura.
///
/// # Errors
///
/// Returns an error when the document is not an open, unconverted presupuesto.
pub fn puede_convertir(
    tipo: TipoComprobante,
    estado: EstadoVenta,
    convertida_a_fiscal: bool,
) -> Result<(), EstadoError> {
    if tipo != TipoComprobante::Presupuesto {
        return Err(EstadoError::NoEsPresupuesto(tipo));
    }
    puede_modificar(estado)?;
    if convertida_a_fiscal {
        return Err(EstadoError::YaConvertido);
    }
    Ok(())
}

/// Computes `es_operacion_efectiva` for reporting: false when the quote was
/// converted to a fiscal document, or when it is a still-open presupuesto.
#[must_use]
pub fn es_operacion_efectiva(tipo: TipoComprobante, convertida_a_fiscal: bool) -> bool {
    if convertida_a_fiscal {
        return false;
    }
    tipo != TipoComprobante::Presupuesto
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_estado_round_trip() {
        assert_eq!(EstadoVenta::from_str("AB").unwrap(), EstadoVenta::Abierto);
        assert_eq!(EstadoVenta::from_str("AN").unwrap(), EstadoVenta::Anulado);
        assert_eq!(EstadoVenta::Abierto.as_str(), "AB");
        assert!(EstadoVenta::from_str("XX").is_err());
    }

    #[test]
    fn test_anular_only_once() {
        assert!(puede_anular(EstadoVenta::Abierto).is_ok());
        assert_eq!(
            puede_anular(EstadoVenta::Anulado),
            Err(EstadoError::YaAnulado)
        );
    }

    #[test]
    fn test_convertir_requires_open_presupuesto() {
        assert!(puede_convertir(TipoComprobante::Presupuesto, EstadoVenta::Abierto, false).is_ok());
        assert_eq!(
            puede_convertir(TipoComprobante::Presupuesto, EstadoVenta::Abierto, true),
            Err(EstadoError::YaConvertido)
        );
        assert_eq!(
            puede_convertir(TipoComprobante::Presupuesto, EstadoVenta::Anulado, false),
            Err(EstadoError::Anulado)
        );
        assert_eq!(
            puede_convertir(TipoComprobante::Factura, EstadoVenta::Abierto, false),
            Err(EstadoError::NoEsPresupuesto(TipoComprobante::Factura))
        );
    }

    #[test]
    fn test_operacion_efectiva() {
        // Converted quote: no longer effective (the factura carries the amounts).
        assert!(!es_operacion_efectiva(TipoComprobante::Presupuesto, true));
        // Open quote: not effective either.
        assert!(!es_operacion_efectiva(TipoComprobante::Presupuesto, false));
        // Regular factura: effective.
        assert!(es_operacion_efectiva(TipoComprobante::Factura, false));
    }
}
