//! Movement classification for the cuenta corriente stream.

use serde::Serialize;

/// Content-type tag identifying which table a movement came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KindCc {
    /// Sales documents (facturas, notas, cotizaciones).
    Venta,
    /// Customer payment receipts.
    Recibo,
    /// Purchases.
    Compra,
    /// Supplier payment orders.
    OrdenPago,
    /// Supplier debit/credit adjustments.
    AjusteProveedor,
}

impl KindCc {
    /// Stable tag used as `ct_id` in serialized movements.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Venta => "venta",
            Self::Recibo => "recibo",
            Self::Compra => "compra",
            Self::OrdenPago => "orden_pago",
            Self::AjusteProveedor => "ajuste_proveedor",
        }
    }
}

/// Which side of the ledger a movement lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lado {
    /// Debit: increases what the party owes.
    Debe,
    /// Credit: payments and credits against debits.
    Haber,
}

/// Movement type, canonicalized without the letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoCc {
    /// Factura (fiscal or interna).
    Factura,
    /// Presupuesto sold as an internal cash document.
    Cotizacion,
    /// Nota de débito.
    NotaDebito,
    /// Nota de crédito.
    NotaCredito,
    /// Recibo de cobro.
    Recibo,
    /// Ajuste proveedor débito.
    AjusteDebito,
    /// Ajuste proveedor crédito.
    AjusteCredito,
    /// Orden de pago.
    OrdenPago,
    /// Compra fiscal.
    Compra,
    /// Compra interna.
    CompraInterna,
}

impl TipoCc {
    /// Ledger side for this type.
    #[must_use]
    pub const fn lado(self) -> Lado {
        match self {
            Self::Factura
            | Self::Cotizacion
            | Self::NotaDebito
            | Self::AjusteDebito
            | Self::Compra
            | Self::CompraInterna => Lado::Debe,
            Self::NotaCredito | Self::Recibo | Self::AjusteCredito | Self::OrdenPago => {
                Lado::Haber
            }
        }
    }

    /// Sort priority within one instant: debits before credits, so a payment
    /// on the same day never drives the running balance negative ahead of
    /// the document it pays.
    #[must_use]
    pub const fn prioridad(self) -> u8 {
        match self.lado() {
            Lado::Debe => 0,
            Lado::Haber => 1,
        }
    }

    /// Canonical display name, without the letter.
    #[must_use]
    pub const fn nombre(self) -> &'static str {
        match self {
            Self::Factura => "Factura",
            Self::Cotizacion => "Cotización",
            Self::NotaDebito => "Nota de Débito",
            Self::NotaCredito => "Nota de Crédito",
            Self::Recibo => "Recibo",
            Self::AjusteDebito => "Ajuste Débito",
            Self::AjusteCredito => "Ajuste Crédito",
            Self::OrdenPago => "Orden de Pago",
            Self::Compra => "Compra",
            Self::CompraInterna => "Compra Interna",
        }
    }

    /// Name of the synthetic auto-imputation row closing this document.
    #[must_use]
    pub const fn nombre_auto_imputacion(self) -> &'static str {
        match self {
            Self::Cotizacion => "Cotización Recibo",
            _ => "Factura Recibo",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debits_sort_before_credits() {
        assert_eq!(TipoCc::Factura.prioridad(), 0);
        assert_eq!(TipoCc::NotaDebito.prioridad(), 0);
        assert_eq!(TipoCc::AjusteDebito.prioridad(), 0);
        assert_eq!(TipoCc::Recibo.prioridad(), 1);
        assert_eq!(TipoCc::NotaCredito.prioridad(), 1);
        assert_eq!(TipoCc::OrdenPago.prioridad(), 1);
    }

    #[test]
    fn test_canonical_names_drop_letter() {
        assert_eq!(TipoCc::Factura.nombre(), "Factura");
        assert_eq!(TipoCc::Cotizacion.nombre(), "Cotización");
        assert_eq!(TipoCc::NotaCredito.nombre(), "Nota de Crédito");
        assert_eq!(TipoCc::CompraInterna.nombre(), "Compra Interna");
    }

    #[test]
    fn test_auto_imputacion_names() {
        assert_eq!(TipoCc::Factura.nombre_auto_imputacion(), "Factura Recibo");
        assert_eq!(
            TipoCc::Cotizacion.nombre_auto_imputacion(),
            "Cotización Recibo"
        );
    }
}
