//! Movement stream construction with running balances.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;

use super::error::CuentaCorrienteError;
use super::tipos::{KindCc, Lado, TipoCc};

/// One of the party's documents, projected for the engine.
#[derive(Debug, Clone)]
pub struct DocumentoCc {
    /// Source table tag.
    pub kind: KindCc,
    /// Row id within the source table.
    pub id: i64,
    /// Civil date of the document.
    pub fecha: NaiveDate,
    /// Creation instant, used as the same-day tiebreaker.
    pub hora: NaiveDateTime,
    /// Movement classification.
    pub tipo: TipoCc,
    /// Document total. `None` for credit documents without item lines
    /// (recibos), whose total derives from their outbound imputations.
    pub total: Option<Decimal>,
    /// Canonical formatted number.
    pub numero_formateado: String,
}

/// One imputation link, projected for the engine.
#[derive(Debug, Clone)]
pub struct ImputacionCc {
    /// Imputation row id.
    pub id: i64,
    /// Credit side (recibo, nota de crédito, orden de pago, ajuste crédito).
    pub origen: (KindCc, i64),
    /// Debit side (factura, compra, ajuste débito).
    pub destino: (KindCc, i64),
    /// Imputed amount, always positive.
    pub monto: Decimal,
}

/// One rendered movement of the stream.
#[derive(Debug, Clone, Serialize)]
pub struct MovimientoCc {
    /// Content-type tag of the source document.
    pub ct_id: &'static str,
    /// Source row id.
    pub id: i64,
    /// Civil date.
    pub fecha: NaiveDate,
    /// Creation instant.
    pub hora: NaiveDateTime,
    /// Canonical name ("Factura", "Recibo", "Factura Recibo", ...).
    pub comprobante_nombre: &'static str,
    /// Movement classification.
    pub comprobante_tipo: TipoCc,
    /// Debit amount.
    pub debe: Decimal,
    /// Credit amount.
    pub haber: Decimal,
    /// Document total this movement represents.
    pub total: Decimal,
    /// Formatted document number.
    pub numero_formateado: String,
    /// Open amount of the underlying document.
    pub saldo_pendiente: Decimal,
    /// Running balance after this movement.
    pub saldo_acumulado: Decimal,
    /// 1 for synthetic auto-imputation rows, 0 for base rows.
    pub orden_auto_imputacion: u8,
    /// Sort priority (0 debit, 1 credit, 2 auto-imputation).
    pub prioridad: u8,
}

/// Tolerance under which a negative pending balance is treated as rounding.
fn tolerancia() -> Decimal {
    Decimal::new(1, 2) // $0.01
}

/// Builds the ordered movement stream for one party.
///
/// `completo = false` (the default query) keeps only movements whose
/// underlying document still has `saldo_pendiente > 0`; running balances are
/// always computed over the full stream first.
///
/// # Errors
///
/// Returns an error when an imputation amount is not positive or when the
/// imputations over a document exceed its total beyond $0.01.
pub fn armar_stream(
    documentos: &[DocumentoCc],
    imputaciones: &[ImputacionCc],
    completo: bool,
) -> Result<Vec<MovimientoCc>, CuentaCorrienteError> {
    let mut imputado_destino: HashMap<(KindCc, i64), Decimal> = HashMap::new();
    let mut imputado_origen: HashMap<(KindCc, i64), Decimal> = HashMap::new();
    let mut auto_imputado: HashMap<(KindCc, i64), Decimal> = HashMap::new();

    for imp in imputaciones {
        if imp.monto <= Decimal::ZERO {
            return Err(CuentaCorrienteError::MontoNoPositivo(imp.monto));
        }
        *imputado_destino.entry(imp.destino).or_default() += imp.monto;
        *imputado_origen.entry(imp.origen).or_default() += imp.monto;
        if imp.origen == imp.destino {
            *auto_imputado.entry(imp.destino).or_default() += imp.monto;
        }
    }

    let mut movimientos = Vec::with_capacity(documentos.len());

    for doc in documentos {
        let clave = (doc.kind, doc.id);
        let (total, imputado) = match doc.tipo.lado() {
            Lado::Debe => {
                let total = doc.total.unwrap_or(Decimal::ZERO);
                (total, imputado_destino.get(&clave).copied().unwrap_or_default())
            }
            Lado::Haber => {
                let imputado = imputado_origen.get(&clave).copied().unwrap_or_default();
                // Credit documents without lines derive their total from
                // what they imputed (an empty recibo totals 0).
                (doc.total.unwrap_or(imputado), imputado)
            }
        };

        let saldo_pendiente = total - imputado;
        if saldo_pendiente < -tolerancia() {
            return Err(CuentaCorrienteError::ImputacionExcedeTotal {
                kind: doc.kind,
                id: doc.id,
                imputado,
                total,
            });
        }

        let (debe, haber) = match doc.tipo.lado() {
            Lado::Debe => (total, Decimal::ZERO),
            Lado::Haber => (Decimal::ZERO, total),
        };

        movimientos.push(MovimientoCc {
            ct_id: doc.kind.tag(),
            id: doc.id,
            fecha: doc.fecha,
            hora: doc.hora,
            comprobante_nombre: doc.tipo.nombre(),
            comprobante_tipo: doc.tipo,
            debe,
            haber,
            total,
            numero_formateado: doc.numero_formateado.clone(),
            saldo_pendiente,
            saldo_acumulado: Decimal::ZERO,
            orden_auto_imputacion: 0,
            prioridad: doc.tipo.prioridad(),
        });

        // Synthetic credit line for the cash sale closed in one step.
        if let Some(monto) = auto_imputado.get(&clave).copied()
            && doc.tipo.lado() == Lado::Debe
        {
            movimientos.push(MovimientoCc {
                ct_id: doc.kind.tag(),
                id: doc.id,
                fecha: doc.fecha,
                hora: doc.hora,
                comprobante_nombre: doc.tipo.nombre_auto_imputacion(),
                comprobante_tipo: doc.tipo,
                debe: Decimal::ZERO,
                haber: monto,
                total: monto,
                numero_formateado: doc.numero_formateado.clone(),
                saldo_pendiente: Decimal::ZERO,
                saldo_acumulado: Decimal::ZERO,
                orden_auto_imputacion: 1,
                prioridad: 2,
            });
        }
    }

    // Deterministic ordering: debits, then credits, then auto-imputations
    // within the same instant; id as the final tiebreaker.
    movimientos.sort_by(|a, b| {
        (a.fecha, a.prioridad, a.hora, a.id, a.orden_auto_imputacion).cmp(&(
            b.fecha,
            b.prioridad,
            b.hora,
            b.id,
            b.orden_auto_imputacion,
        ))
    });

    let mut saldo = Decimal::ZERO;
    for mov in &mut movimientos {
        saldo += mov.debe - mov.haber;
        mov.saldo_acumulado = saldo;
    }

    if !completo {
        movimientos.retain(|m| m.saldo_pendiente > Decimal::ZERO);
    }

    Ok(movimientos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hora(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn fecha() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    fn factura(id: i64, total: Decimal) -> DocumentoCc {
        DocumentoCc {
            kind: KindCc::Venta,
            id,
            fecha: fecha(),
            hora: hora(9, 0),
            tipo: TipoCc::Factura,
            total: Some(total),
            numero_formateado: format!("A 0001-{id:08}"),
        }
    }

    fn recibo(id: i64) -> DocumentoCc {
        DocumentoCc {
            kind: KindCc::Recibo,
            id,
            fecha: fecha(),
            hora: hora(10, 0),
            tipo: TipoCc::Recibo,
            total: None,
            numero_formateado: format!("X 0001-{id:08}"),
        }
    }

    #[test]
    fn test_factura_and_partial_recibo() {
        // S5: factura $1000, recibo $400 imputed $400 to it.
        let docs = vec![factura(1, dec!(1000)), recibo(2)];
        let imps = vec![ImputacionCc {
            id: 1,
            origen: (KindCc::Recibo, 2),
            destino: (KindCc::Venta, 1),
            monto: dec!(400),
        }];

        let stream = armar_stream(&docs, &imps, true).unwrap();
        assert_eq!(stream.len(), 2);

        let f = &stream[0];
        assert_eq!(f.comprobante_nombre, "Factura");
        assert_eq!(f.debe, dec!(1000));
        assert_eq!(f.haber, Decimal::ZERO);
        assert_eq!(f.saldo_acumulado, dec!(1000));
        assert_eq!(f.saldo_pendiente, dec!(600));

        let r = &stream[1];
        assert_eq!(r.comprobante_nombre, "Recibo");
        assert_eq!(r.haber, dec!(400));
        assert_eq!(r.saldo_acumulado, dec!(600));
        assert_eq!(r.saldo_pendiente, Decimal::ZERO);

        // Default filter keeps only open documents: just the factura.
        let abiertos = armar_stream(&docs, &imps, false).unwrap();
        assert_eq!(abiertos.len(), 1);
        assert_eq!(abiertos[0].comprobante_nombre, "Factura");
        assert_eq!(abiertos[0].saldo_acumulado, dec!(1000));
    }

    #[test]
    fn test_factura_recibo_cash_sale() {
        // S6: cash sale $500 auto-imputed against itself.
        let docs = vec![factura(1, dec!(500))];
        let imps = vec![ImputacionCc {
            id: 1,
            origen: (KindCc::Venta, 1),
            destino: (KindCc::Venta, 1),
            monto: dec!(500),
        }];

        let stream = armar_stream(&docs, &imps, true).unwrap();
        assert_eq!(stream.len(), 2);

        assert_eq!(stream[0].comprobante_nombre, "Factura");
        assert_eq!(stream[0].debe, dec!(500));
        assert_eq!(stream[0].saldo_pendiente, Decimal::ZERO);
        assert_eq!(stream[0].orden_auto_imputacion, 0);

        assert_eq!(stream[1].comprobante_nombre, "Factura Recibo");
        assert_eq!(stream[1].haber, dec!(500));
        assert_eq!(stream[1].saldo_pendiente, Decimal::ZERO);
        assert_eq!(stream[1].saldo_acumulado, Decimal::ZERO);
        assert_eq!(stream[1].orden_auto_imputacion, 1);
        assert_eq!(stream[1].prioridad, 2);
    }

    #[test]
    fn test_cotizacion_recibo_naming() {
        let docs = vec![DocumentoCc {
            tipo: TipoCc::Cotizacion,
            ..factura(1, dec!(300))
        }];
        let imps = vec![ImputacionCc {
            id: 1,
            origen: (KindCc::Venta, 1),
            destino: (KindCc::Venta, 1),
            monto: dec!(300),
        }];
        let stream = armar_stream(&docs, &imps, true).unwrap();
        assert_eq!(stream[0].comprobante_nombre, "Cotización");
        assert_eq!(stream[1].comprobante_nombre, "Cotización Recibo");
    }

    #[test]
    fn test_debits_sort_before_credits_same_instant() {
        let mut nc = recibo(3);
        nc.tipo = TipoCc::NotaCredito;
        nc.hora = hora(9, 0);
        nc.total = Some(dec!(100));
        let docs = vec![nc, factura(1, dec!(1000))];
        let stream = armar_stream(&docs, &[], true).unwrap();
        assert_eq!(stream[0].comprobante_nombre, "Factura");
        assert_eq!(stream[1].comprobante_nombre, "Nota de Crédito");
        // Balance never dips below zero in this ordering.
        assert_eq!(stream[0].saldo_acumulado, dec!(1000));
        assert_eq!(stream[1].saldo_acumulado, dec!(900));
    }

    #[test]
    fn test_empty_recibo_totals_zero() {
        let docs = vec![recibo(1)];
        let stream = armar_stream(&docs, &[], true).unwrap();
        assert_eq!(stream[0].total, Decimal::ZERO);
        assert_eq!(stream[0].haber, Decimal::ZERO);
    }

    #[test]
    fn test_over_imputation_is_flagged() {
        let docs = vec![factura(1, dec!(100)), recibo(2)];
        let imps = vec![ImputacionCc {
            id: 1,
            origen: (KindCc::Recibo, 2),
            destino: (KindCc::Venta, 1),
            monto: dec!(150),
        }];
        assert!(matches!(
            armar_stream(&docs, &imps, true),
            Err(CuentaCorrienteError::ImputacionExcedeTotal { id: 1, .. })
        ));
    }

    #[test]
    fn test_non_positive_imputation_rejected() {
        let docs = vec![factura(1, dec!(100))];
        let imps = vec![ImputacionCc {
            id: 1,
            origen: (KindCc::Venta, 1),
            destino: (KindCc::Venta, 1),
            monto: Decimal::ZERO,
        }];
        assert!(matches!(
            armar_stream(&docs, &imps, true),
            Err(CuentaCorrienteError::MontoNoPositivo(_))
        ));
    }

    #[test]
    fn test_supplier_mirror_shape() {
        let compra = DocumentoCc {
            kind: KindCc::Compra,
            id: 1,
            fecha: fecha(),
            hora: hora(9, 0),
            tipo: TipoCc::Compra,
            total: Some(dec!(800)),
            numero_formateado: "A 0002-00000010".into(),
        };
        let op = DocumentoCc {
            kind: KindCc::OrdenPago,
            id: 1,
            fecha: fecha(),
            hora: hora(11, 0),
            tipo: TipoCc::OrdenPago,
            total: None,
            numero_formateado: "X 0001-00000001".into(),
        };
        let imps = vec![ImputacionCc {
            id: 1,
            origen: (KindCc::OrdenPago, 1),
            destino: (KindCc::Compra, 1),
            monto: dec!(800),
        }];
        let stream = armar_stream(&[compra, op], &imps, true).unwrap();
        assert_eq!(stream[0].comprobante_nombre, "Compra");
        assert_eq!(stream[1].comprobante_nombre, "Orden de Pago");
        assert_eq!(stream[1].saldo_acumulado, Decimal::ZERO);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            // Conservation: sum of debe minus sum of haber equals the final
            // running balance, whatever the mix of documents.
            #[test]
            fn conservation(totales in proptest::collection::vec(1i64..1_000_000, 1..20)) {
                let docs: Vec<DocumentoCc> = totales
                    .iter()
                    .enumerate()
                    .map(|(i, t)| {
                        let tipo = if i % 3 == 0 { TipoCc::Recibo } else { TipoCc::Factura };
                        DocumentoCc {
                            kind: if tipo == TipoCc::Recibo { KindCc::Recibo } else { KindCc::Venta },
                            id: i64::try_from(i).unwrap(),
                            fecha: fecha(),
                            hora: hora(9, u32::try_from(i % 60).unwrap()),
                            tipo,
                            total: Some(Decimal::new(*t, 2)),
                            numero_formateado: String::new(),
                        }
                    })
                    .collect();

                let stream = armar_stream(&docs, &[], true).unwrap();
                let debe: Decimal = stream.iter().map(|m| m.debe).sum();
                let haber: Decimal = stream.iter().map(|m| m.haber).sum();
                let ultimo = stream.last().unwrap().saldo_acumulado;
                prop_assert_eq!(debe - haber, ultimo);
            }
        }
    }
}
