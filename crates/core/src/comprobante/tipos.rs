//! Comprobante letters, types and the canonical number format.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for comprobante catalog parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComprobanteError {
    /// Unknown comprobante letter.
    #[error("Unknown comprobante letter: {0}")]
    UnknownLetra(String),

    /// Unknown comprobante type.
    #[error("Unknown comprobante type: {0}")]
    UnknownTipo(String),

    /// The AFIP code is not numeric.
    #[error("Invalid AFIP code: {0}")]
    InvalidCodigoAfip(String),
}

/// Comprobante letter.
///
/// A/B/C are fiscal; E export; I/P/O internal (factura interna, presupuesto,
/// orden de compra).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Letra {
    /// Responsable inscripto a responsable inscripto.
    A,
    /// Responsable inscripto a consumidor final / exento.
    B,
    /// Monotributista.
    C,
    /// Exportación.
    E,
    /// Interna (no fiscal).
    I,
    /// Presupuesto.
    P,
    /// Orden de compra.
    O,
}

impl Letra {
    /// True for the letters AFIP authorizes (A/B/C).
    #[must_use]
    pub const fn es_fiscal(self) -> bool {
        matches!(self, Self::A | Self::B | Self::C)
    }
}

impl std::fmt::Display for Letra {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::E => "E",
            Self::I => "I",
            Self::P => "P",
            Self::O => "O",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Letra {
    type Err = ComprobanteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "E" => Ok(Self::E),
            "I" => Ok(Self::I),
            "P" => Ok(Self::P),
            "O" => Ok(Self::O),
            other => Err(ComprobanteError::UnknownLetra(other.to_string())),
        }
    }
}

/// Comprobante type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoComprobante {
    /// Factura fiscal.
    Factura,
    /// Factura interna (no fiscal).
    FacturaInterna,
    /// Nota de débito fiscal.
    NotaDebito,
    /// Nota de débito interna.
    NotaDebitoInterna,
    /// Nota de crédito fiscal.
    NotaCredito,
    /// Nota de crédito interna.
    NotaCreditoInterna,
    /// Recibo de cobro.
    Recibo,
    /// Presupuesto (cotización).
    Presupuesto,
    /// Orden de compra interna.
    OrdenCompra,
}

impl TipoComprobante {
    /// True when documents of this type draw numbers from AFIP.
    #[must_use]
    pub const fn es_fiscal(self) -> bool {
        matches!(self, Self::Factura | Self::NotaDebito | Self::NotaCredito)
    }

    /// True for notas (crédito or débito, fiscal or internal).
    #[must_use]
    pub const fn es_nota(self) -> bool {
        matches!(
            self,
            Self::NotaCredito
                | Self::NotaCreditoInterna
                | Self::NotaDebito
                | Self::NotaDebitoInterna
        )
    }

    /// Canonical display name without the letter, as used by the cuenta
    /// corriente stream ("Factura", "Nota de Crédito", ...).
    #[must_use]
    pub const fn nombre_canonico(self) -> &'static str {
        match self {
            Self::Factura | Self::FacturaInterna => "Factura",
            Self::NotaDebito | Self::NotaDebitoInterna => "Nota de Débito",
            Self::NotaCredito | Self::NotaCreditoInterna => "Nota de Crédito",
            Self::Recibo => "Recibo",
            Self::Presupuesto => "Cotización",
            Self::OrdenCompra => "Orden de Compra",
        }
    }
}

impl std::fmt::Display for TipoComprobante {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Factura => "factura",
            Self::FacturaInterna => "factura_interna",
            Self::NotaDebito => "nota_debito",
            Self::NotaDebitoInterna => "nota_debito_interna",
            Self::NotaCredito => "nota_credito",
            Self::NotaCreditoInterna => "nota_credito_interna",
            Self::Recibo => "recibo",
            Self::Presupuesto => "presupuesto",
            Self::OrdenCompra => "orden_compra",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for TipoComprobante {
    type Err = ComprobanteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "factura" => Ok(Self::Factura),
            "factura_interna" => Ok(Self::FacturaInterna),
            "nota_debito" => Ok(Self::NotaDebito),
            "nota_debito_interna" => Ok(Self::NotaDebitoInterna),
            "nota_credito" => Ok(Self::NotaCredito),
            "nota_credito_interna" => Ok(Self::NotaCreditoInterna),
            "recibo" => Ok(Self::Recibo),
            "presupuesto" => Ok(Self::Presupuesto),
            "orden_compra" => Ok(Self::OrdenCompra),
            other => Err(ComprobanteError::UnknownTipo(other.to_string())),
        }
    }
}

/// Parses the AFIP numeric document code from its zero-padded string key
/// (e.g. `"001"` -> 1, `"011"` -> 11, `"9997"` -> 9997).
///
/// # Errors
///
/// Returns an error when the code contains non-digits.
pub fn cbte_tipo(codigo_afip: &str) -> Result<u32, ComprobanteError> {
    codigo_afip
        .parse::<u32>()
        .map_err(|_| ComprobanteError::InvalidCodigoAfip(codigo_afip.to_string()))
}

/// Formats the canonical document number: `"{letra} {punto:04}-{numero:08}"`.
#[must_use]
pub fn numero_formateado(letra: Letra, punto: u32, numero: u64) -> String {
    format!("{letra} {punto:04}-{numero:08}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_numero_formateado() {
        assert_eq!(numero_formateado(Letra::A, 1, 42), "A 0001-00000042");
        assert_eq!(numero_formateado(Letra::P, 12, 1), "P 0012-00000001");
        assert_eq!(
            numero_formateado(Letra::B, 9999, 99_999_999),
            "B 9999-99999999"
        );
    }

    #[test]
    fn test_letra_fiscal() {
        assert!(Letra::A.es_fiscal());
        assert!(Letra::B.es_fiscal());
        assert!(Letra::C.es_fiscal());
        assert!(!Letra::I.es_fiscal());
        assert!(!Letra::P.es_fiscal());
        assert!(!Letra::O.es_fiscal());
    }

    #[test]
    fn test_tipo_fiscal() {
        assert!(TipoComprobante::Factura.es_fiscal());
        assert!(TipoComprobante::NotaCredito.es_fiscal());
        assert!(!TipoComprobante::FacturaInterna.es_fiscal());
        assert!(!TipoComprobante::Presupuesto.es_fiscal());
        assert!(!TipoComprobante::Recibo.es_fiscal());
    }

    #[test]
    fn test_cbte_tipo_from_codigo_afip() {
        assert_eq!(cbte_tipo("001").unwrap(), 1);
        assert_eq!(cbte_tipo("006").unwrap(), 6);
        assert_eq!(cbte_tipo("011").unwrap(), 11);
        assert_eq!(cbte_tipo("9997").unwrap(), 9997);
        assert!(cbte_tipo("00A").is_err());
    }

    #[test]
    fn test_letra_round_trip() {
        for letra in ["A", "B", "C", "E", "I", "P", "O"] {
            assert_eq!(Letra::from_str(letra).unwrap().to_string(), letra);
        }
        assert!(Letra::from_str("X").is_err());
    }

    #[test]
    fn test_tipo_round_trip() {
        let tipo = TipoComprobante::from_str("nota_credito_interna").unwrap();
        assert_eq!(tipo, TipoComprobante::NotaCreditoInterna);
        assert_eq!(tipo.to_string(), "nota_credito_interna");
    }

    #[test]
    fn test_nombre_canonico_drops_letter() {
        assert_eq!(TipoComprobante::Factura.nombre_canonico(), "Factura");
        assert_eq!(
            TipoComprobante::FacturaInterna.nombre_canonico(),
            "Factura"
        );
        assert_eq!(
            TipoComprobante::Presupuesto.nombre_canonico(),
            "Cotización"
        );
        assert_eq!(
            TipoComprobante::NotaCredito.nombre_canonico(),
            "Nota de Crédito"
        );
    }
}
