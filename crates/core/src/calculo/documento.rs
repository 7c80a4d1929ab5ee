//! Per-document aggregation and IVA rate buckets.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use ferredesk_shared::types::round2;

use super::error::CalculoError;
use super::linea::{DescuentosCabecera, LineaBase, LineaCalculada, calcular_linea};

/// One VAT rate bucket (`VENTAIVA_ALICUOTA`): lines grouped by `ali_porce`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketIva {
    /// IVA rate percentage.
    pub porcentaje: Decimal,
    /// Sum of net subtotals taxed at this rate.
    pub neto_gravado: Decimal,
    /// Sum of IVA amounts at this rate.
    pub iva_total: Decimal,
}

/// Derived per-document quantities.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentoCalculado {
    /// Calculated lines, in input order.
    pub lineas: Vec<LineaCalculada>,
    /// Gross subtotal before bonifications and discounts.
    pub subtotal_bruto: Decimal,
    /// `ven_impneto`: sum of net line subtotals.
    pub ven_impneto: Decimal,
    /// `iva_global`: sum of line IVA amounts.
    pub iva_global: Decimal,
    /// `ven_total = ven_impneto + iva_global - max(0, descuento_cierre)`.
    pub ven_total: Decimal,
    /// Closing rounding adjustment actually applied.
    pub descuento_cierre: Decimal,
    /// VAT buckets keyed by rate, ascending.
    pub alicuotas: Vec<BucketIva>,
}

/// Derives the whole document: every line plus the aggregates.
///
/// Pure function over `(lines, header discounts, descuento_cierre)`.
///
/// # Errors
///
/// Returns the first line-level validation error encountered.
pub fn calcular_documento(
    lineas: &[LineaBase],
    descuentos: DescuentosCabecera,
    descuento_cierre: Decimal,
) -> Result<DocumentoCalculado, CalculoError> {
    let mut calculadas = Vec::with_capacity(lineas.len());
    let mut subtotal_bruto = Decimal::ZERO;
    let mut ven_impneto = Decimal::ZERO;
    let mut iva_global = Decimal::ZERO;
    let mut buckets: BTreeMap<Decimal, (Decimal, Decimal)> = BTreeMap::new();

    for linea in lineas {
        let calc = calcular_linea(linea, descuentos)?;

        subtotal_bruto += round2(calc.precio_unitario_sin_iva * calc.cantidad);
        ven_impneto += calc.subtotal_neto;
        iva_global += calc.iva_monto;

        let bucket = buckets
            .entry(calc.ali_porce)
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        bucket.0 += calc.subtotal_neto;
        bucket.1 += calc.iva_monto;

        calculadas.push(calc);
    }

    // A negative descuento_cierre never increases the total.
    let descuento_cierre = descuento_cierre.max(Decimal::ZERO);
    let ven_total = ven_impneto + iva_global - descuento_cierre;

    let alicuotas = buckets
        .into_iter()
        .map(|(porcentaje, (neto_gravado, iva_total))| BucketIva {
            porcentaje,
            neto_gravado,
            iva_total,
        })
        .collect();

    Ok(DocumentoCalculado {
        lineas: calculadas,
        subtotal_bruto,
        ven_impneto,
        iva_global,
        ven_total,
        descuento_cierre,
        alicuotas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn linea(orden: u32, costo: Decimal, ali: Decimal, cantidad: Decimal) -> LineaBase {
        LineaBase {
            orden,
            cantidad,
            costo,
            margen: dec!(40),
            bonifica: dec!(0),
            ali_porce: ali,
            precio_unitario_final: None,
        }
    }

    #[test]
    fn test_factura_b_simple_document() {
        let lineas = [linea(1, dec!(100), dec!(21), dec!(1))];
        let doc =
            calcular_documento(&lineas, DescuentosCabecera::default(), Decimal::ZERO).unwrap();
        assert_eq!(doc.ven_impneto, dec!(140.00));
        assert_eq!(doc.iva_global, dec!(29.40));
        assert_eq!(doc.ven_total, dec!(169.40));
        assert_eq!(doc.alicuotas.len(), 1);
        assert_eq!(doc.alicuotas[0].porcentaje, dec!(21));
        assert_eq!(doc.alicuotas[0].neto_gravado, dec!(140.00));
        assert_eq!(doc.alicuotas[0].iva_total, dec!(29.40));
    }

    #[test]
    fn test_rate_buckets_conserve_totals() {
        let lineas = [
            linea(1, dec!(100), dec!(21), dec!(2)),
            linea(2, dec!(50), dec!(10.5), dec!(1)),
            linea(3, dec!(20), dec!(21), dec!(3)),
            linea(4, dec!(10), dec!(0), dec!(4)),
        ];
        let doc =
            calcular_documento(&lineas, DescuentosCabecera::default(), Decimal::ZERO).unwrap();

        let neto: Decimal = doc.alicuotas.iter().map(|b| b.neto_gravado).sum();
        let iva: Decimal = doc.alicuotas.iter().map(|b| b.iva_total).sum();
        assert_eq!(neto, doc.ven_impneto);
        assert_eq!(iva, doc.iva_global);
        assert_eq!(doc.alicuotas.len(), 3);
    }

    #[test]
    fn test_descuento_cierre_reduces_total() {
        let lineas = [linea(1, dec!(100), dec!(21), dec!(1))];
        let doc =
            calcular_documento(&lineas, DescuentosCabecera::default(), dec!(0.40)).unwrap();
        assert_eq!(doc.ven_total, dec!(169.00));
        assert_eq!(doc.descuento_cierre, dec!(0.40));
    }

    #[test]
    fn test_negative_descuento_cierre_is_clamped() {
        let lineas = [linea(1, dec!(100), dec!(21), dec!(1))];
        let doc =
            calcular_documento(&lineas, DescuentosCabecera::default(), dec!(-5)).unwrap();
        assert_eq!(doc.ven_total, dec!(169.40));
        assert_eq!(doc.descuento_cierre, Decimal::ZERO);
    }

    #[test]
    fn test_empty_document_is_zero() {
        let doc = calcular_documento(&[], DescuentosCabecera::default(), Decimal::ZERO).unwrap();
        assert_eq!(doc.ven_total, Decimal::ZERO);
        assert!(doc.alicuotas.is_empty());
    }

    #[test]
    fn test_line_error_propagates() {
        let mut bad = linea(2, dec!(100), dec!(21), dec!(1));
        bad.cantidad = dec!(-3);
        let lineas = [linea(1, dec!(100), dec!(21), dec!(1)), bad];
        assert!(matches!(
            calcular_documento(&lineas, DescuentosCabecera::default(), Decimal::ZERO),
            Err(CalculoError::CantidadNegativa { orden: 2, .. })
        ));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn decimal_in(lo: i64, hi: i64, scale: u32) -> impl Strategy<Value = Decimal> {
            (lo..hi).prop_map(move |n| Decimal::new(n, scale))
        }

        proptest! {
            // Re-running the engine over the same inputs yields identical
            // values: the derivation is deterministic.
            #[test]
            fn calc_is_deterministic(
                costo in decimal_in(0, 1_000_000, 2),
                margen in decimal_in(0, 20_000, 2),
                bonifica in decimal_in(0, 9_999, 2),
                cantidad in decimal_in(0, 100_000, 2),
            ) {
                let lineas = [LineaBase {
                    orden: 1,
                    cantidad,
                    costo,
                    margen,
                    bonifica,
                    ali_porce: Decimal::new(21, 0),
                    precio_unitario_final: None,
                }];
                let a = calcular_documento(&lineas, DescuentosCabecera::default(), Decimal::ZERO).unwrap();
                let b = calcular_documento(&lineas, DescuentosCabecera::default(), Decimal::ZERO).unwrap();
                prop_assert_eq!(a.ven_total, b.ven_total);
                prop_assert_eq!(a.lineas[0].subtotal_neto, b.lineas[0].subtotal_neto);
            }

            // Bucket sums always equal the document aggregates.
            #[test]
            fn buckets_conserve(
                costo1 in decimal_in(1, 100_000, 2),
                costo2 in decimal_in(1, 100_000, 2),
                qty in decimal_in(1, 1_000, 0),
            ) {
                let lineas = [
                    LineaBase { orden: 1, cantidad: qty, costo: costo1, margen: Decimal::new(30, 0), bonifica: Decimal::ZERO, ali_porce: Decimal::new(21, 0), precio_unitario_final: None },
                    LineaBase { orden: 2, cantidad: qty, costo: costo2, margen: Decimal::new(30, 0), bonifica: Decimal::ZERO, ali_porce: Decimal::new(105, 1), precio_unitario_final: None },
                ];
                let doc = calcular_documento(&lineas, DescuentosCabecera::default(), Decimal::ZERO).unwrap();
                let neto: Decimal = doc.alicuotas.iter().map(|b| b.neto_gravado).sum();
                let iva: Decimal = doc.alicuotas.iter().map(|b| b.iva_total).sum();
                prop_assert_eq!(neto, doc.ven_impneto);
                prop_assert_eq!(iva, doc.iva_global);
            }
        }
    }
}
