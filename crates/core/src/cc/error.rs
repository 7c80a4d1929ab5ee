//! Cuenta corriente engine errors.

use rust_decimal::Decimal;
use thiserror::Error;

use super::tipos::KindCc;

/// Consistency errors the stream builder flags.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CuentaCorrienteError {
    /// Imputations against a document exceed its total.
    #[error("Imputations over {kind:?} {id} exceed its total: {imputado} > {total}")]
    ImputacionExcedeTotal {
        /// Document kind.
        kind: KindCc,
        /// Document id.
        id: i64,
        /// Sum of imputations.
        imputado: Decimal,
        /// Document total.
        total: Decimal,
    },

    /// Imputation amounts must be positive.
    #[error("Imputation amount must be positive, got {0}")]
    MontoNoPositivo(Decimal),
}
