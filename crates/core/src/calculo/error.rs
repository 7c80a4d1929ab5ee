//! Calculation engine error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while deriving line or document values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculoError {
    /// The line references an IVA rate with a negative percentage.
    #[error("Invalid IVA rate percentage: {0}")]
    AlicuotaInvalida(Decimal),

    /// Quantities must be non-negative.
    #[error("Line {orden}: quantity cannot be negative ({cantidad})")]
    CantidadNegativa {
        /// Line ordinal within the document.
        orden: u32,
        /// Offending quantity.
        cantidad: Decimal,
    },

    /// Costs must be non-negative (zero is permitted and yields margen 0).
    #[error("Line {orden}: cost cannot be negative ({costo})")]
    CostoNegativo {
        /// Line ordinal within the document.
        orden: u32,
        /// Offending cost.
        costo: Decimal,
    },
}
