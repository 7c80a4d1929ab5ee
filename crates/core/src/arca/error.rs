//! Payload assembly errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while assembling a `FECAESolicitar` payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// Type A documents require the receptor's CUIT.
    #[error("Comprobante type {0} requires the customer's CUIT")]
    CuitRequerido(u32),

    /// The comprobante code is not one AFIP authorizes.
    #[error("Comprobante type {0} is not a fiscal AFIP type")]
    TipoNoSoportado(u32),

    /// The IVA percentage has no AFIP rate id.
    #[error("IVA rate {0}% has no AFIP alícuota id")]
    AlicuotaSinCodigo(Decimal),

    /// Notas must reference at least one associated factura.
    #[error("Nota {0} has no associated factura (ComprobanteAsociacion missing)")]
    NotaSinAsociacion(u32),

    /// The receptor document number is not numeric.
    #[error("Receptor document number is not numeric: {0}")]
    DocumentoInvalido(String),
}
