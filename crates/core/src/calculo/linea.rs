//! Per-line derivation.
//!
//! Reproduces the canonical formulae of the historical
//! `VENTADETALLEITEM_CALCULADO` view: intermediate unit prices rounded at 4
//! decimals, margins at 3, line totals at 2, all half away from zero.

use rust_decimal::Decimal;
use serde::Serialize;

use ferredesk_shared::types::{round2, round3, round4};

use super::error::CalculoError;

/// Stored base fields of a sales line, as the engine consumes them.
#[derive(Debug, Clone)]
pub struct LineaBase {
    /// Ordinal within the document (`vdi_orden`).
    pub orden: u32,
    /// Quantity (`vdi_cantidad`).
    pub cantidad: Decimal,
    /// Unit cost (`vdi_costo`).
    pub costo: Decimal,
    /// Margin percentage (`vdi_margen`).
    pub margen: Decimal,
    /// Per-line bonification percentage (`vdi_bonifica`).
    pub bonifica: Decimal,
    /// IVA rate percentage from the referenced alícuota (`ali_porce`).
    pub ali_porce: Decimal,
    /// When present, the authoritative final unit price WITH IVA
    /// (`vdi_precio_unitario_final`), driven by price lists.
    pub precio_unitario_final: Option<Decimal>,
}

/// Header-level discount cascade (`ven_descu1/2/3`), percentages.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescuentosCabecera {
    /// First discount percentage.
    pub descu1: Decimal,
    /// Second discount percentage.
    pub descu2: Decimal,
    /// Third discount percentage.
    pub descu3: Decimal,
}

/// Derived per-line quantities. Never stored.
#[derive(Debug, Clone, Serialize)]
pub struct LineaCalculada {
    /// Line ordinal.
    pub orden: u32,
    /// IVA rate percentage used.
    pub ali_porce: Decimal,
    /// Quantity.
    pub cantidad: Decimal,
    /// Unit price before IVA (4 decimals).
    pub precio_unitario_sin_iva: Decimal,
    /// IVA portion of one unit (2 decimals).
    pub iva_unitario: Decimal,
    /// Net bonification amount per unit (4 decimals).
    pub bonif_monto_unit_neto: Decimal,
    /// Unit price net of line bonification, before header discounts.
    pub precio_unit_bonif_sin_iva: Decimal,
    /// Unit price after the header discount cascade, before IVA (4 decimals).
    pub precio_unitario_bonif_desc_sin_iva: Decimal,
    /// Final unit price with IVA after bonification and discounts (2 decimals).
    pub precio_unitario_bonificado_con_iva: Decimal,
    /// Alias of the final unit price with IVA, kept for serializers.
    pub precio_unitario_bonificado: Decimal,
    /// Net line subtotal (2 decimals).
    pub subtotal_neto: Decimal,
    /// Line IVA amount (2 decimals).
    pub iva_monto: Decimal,
    /// Line total with IVA (2 decimals).
    pub total_item: Decimal,
    /// Unit margin amount over cost (3 decimals).
    pub margen_monto: Decimal,
    /// Margin percentage over cost (3 decimals); 0 when costo is 0.
    pub margen_porcentaje: Decimal,
}

const CIEN: Decimal = Decimal::ONE_HUNDRED;

/// Derives all calculated values for one line.
///
/// When `precio_unitario_final` is present it is authoritative: the per-line
/// bonification is considered embedded in it, so `bonif_monto_unit_neto` is
/// reported but does not reduce the price again. Otherwise the price builds
/// from cost, margin and bonification.
///
/// # Errors
///
/// Returns an error for negative quantities, negative costs, or a negative
/// IVA percentage.
pub fn calcular_linea(
    linea: &LineaBase,
    descuentos: DescuentosCabecera,
) -> Result<LineaCalculada, CalculoError> {
    if linea.ali_porce < Decimal::ZERO {
        return Err(CalculoError::AlicuotaInvalida(linea.ali_porce));
    }
    if linea.cantidad < Decimal::ZERO {
        return Err(CalculoError::CantidadNegativa {
            orden: linea.orden,
            cantidad: linea.cantidad,
        });
    }
    if linea.costo < Decimal::ZERO {
        return Err(CalculoError::CostoNegativo {
            orden: linea.orden,
            costo: linea.costo,
        });
    }

    let factor_iva = Decimal::ONE + linea.ali_porce / CIEN;

    // Step 1: unit price before IVA.
    let (precio_sin_iva, precio_final_presente) = match linea.precio_unitario_final {
        Some(precio_con_iva) => (round4(precio_con_iva / factor_iva), true),
        None => (
            round4(
                linea.costo
                    * (Decimal::ONE + linea.margen / CIEN)
                    * (Decimal::ONE - linea.bonifica / CIEN),
            ),
            false,
        ),
    };

    // Steps 2-3: bonification figure; it only re-reduces the price when the
    // price was built from cost (the final list price already embeds it).
    let bonif_monto_unit_neto = round4(precio_sin_iva * linea.bonifica / CIEN);
    let precio_unit_bonif_sin_iva = if precio_final_presente {
        precio_sin_iva
    } else {
        precio_sin_iva - bonif_monto_unit_neto
    };

    // Step 4: header discount cascade.
    let precio_unitario_bonif_desc_sin_iva = round4(
        precio_unit_bonif_sin_iva
            * (Decimal::ONE - descuentos.descu1 / CIEN)
            * (Decimal::ONE - descuentos.descu2 / CIEN)
            * (Decimal::ONE - descuentos.descu3 / CIEN),
    );

    // Steps 5-8: final unit price and line aggregates.
    let precio_unitario_bonificado_con_iva =
        round2(precio_unitario_bonif_desc_sin_iva * factor_iva);
    let subtotal_neto = round2(precio_unitario_bonif_desc_sin_iva * linea.cantidad);
    let iva_monto = round2(subtotal_neto * linea.ali_porce / CIEN);
    let total_item = round2(precio_unitario_bonificado_con_iva * linea.cantidad);
    let iva_unitario = round2(precio_unitario_bonif_desc_sin_iva * linea.ali_porce / CIEN);

    // Step 9: margins over cost.
    let margen_monto = round3(precio_sin_iva - linea.costo);
    let margen_porcentaje = if linea.costo > Decimal::ZERO {
        round3((precio_sin_iva - linea.costo) / linea.costo * CIEN)
    } else {
        Decimal::ZERO
    };

    Ok(LineaCalculada {
        orden: linea.orden,
        ali_porce: linea.ali_porce,
        cantidad: linea.cantidad,
        precio_unitario_sin_iva: precio_sin_iva,
        iva_unitario,
        bonif_monto_unit_neto,
        precio_unit_bonif_sin_iva,
        precio_unitario_bonif_desc_sin_iva,
        precio_unitario_bonificado_con_iva,
        precio_unitario_bonificado: precio_unitario_bonificado_con_iva,
        subtotal_neto,
        iva_monto,
        total_item,
        margen_monto,
        margen_porcentaje,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn linea_simple() -> LineaBase {
        LineaBase {
            orden: 1,
            cantidad: dec!(1),
            costo: dec!(100),
            margen: dec!(40),
            bonifica: dec!(0),
            ali_porce: dec!(21),
            precio_unitario_final: None,
        }
    }

    #[test]
    fn test_factura_b_simple_scenario() {
        // costo=100, margen=40, IVA 21%, no discounts.
        let calc = calcular_linea(&linea_simple(), DescuentosCabecera::default()).unwrap();
        assert_eq!(calc.precio_unitario_sin_iva, dec!(140.0000));
        assert_eq!(calc.subtotal_neto, dec!(140.00));
        assert_eq!(calc.iva_monto, dec!(29.40));
        assert_eq!(calc.total_item, dec!(169.40));
        assert_eq!(calc.margen_monto, dec!(40.000));
        assert_eq!(calc.margen_porcentaje, dec!(40.000));
    }

    #[test]
    fn test_precio_final_is_authoritative() {
        let linea = LineaBase {
            precio_unitario_final: Some(dec!(169.40)),
            // Cost fields present but the final price wins.
            costo: dec!(90),
            margen: dec!(10),
            ..linea_simple()
        };
        let calc = calcular_linea(&linea, DescuentosCabecera::default()).unwrap();
        assert_eq!(calc.precio_unitario_sin_iva, dec!(140.0000));
        assert_eq!(calc.total_item, dec!(169.40));
    }

    #[test]
    fn test_precio_final_does_not_rereduce_bonifica() {
        let linea = LineaBase {
            precio_unitario_final: Some(dec!(121)),
            bonifica: dec!(10),
            ..linea_simple()
        };
        let calc = calcular_linea(&linea, DescuentosCabecera::default()).unwrap();
        // precio_sin_iva = 121 / 1.21 = 100; the 10% bonif is reported…
        assert_eq!(calc.precio_unitario_sin_iva, dec!(100.0000));
        assert_eq!(calc.bonif_monto_unit_neto, dec!(10.0000));
        // …but the price is not reduced again.
        assert_eq!(calc.precio_unit_bonif_sin_iva, dec!(100.0000));
        assert_eq!(calc.total_item, dec!(121.00));
    }

    #[test]
    fn test_bonifica_reduces_cost_built_price() {
        let linea = LineaBase {
            bonifica: dec!(10),
            ..linea_simple()
        };
        let calc = calcular_linea(&linea, DescuentosCabecera::default()).unwrap();
        // Step 1: 100 * 1.40 * 0.90 = 126
        assert_eq!(calc.precio_unitario_sin_iva, dec!(126.0000));
        // Steps 2-3: 126 * 10% = 12.6 reported and subtracted
        assert_eq!(calc.bonif_monto_unit_neto, dec!(12.6000));
        assert_eq!(calc.precio_unit_bonif_sin_iva, dec!(113.4000));
    }

    #[test]
    fn test_header_discount_cascade() {
        let descuentos = DescuentosCabecera {
            descu1: dec!(10),
            descu2: dec!(5),
            descu3: dec!(0),
        };
        let calc = calcular_linea(&linea_simple(), descuentos).unwrap();
        // 140 * 0.90 * 0.95 = 119.70
        assert_eq!(calc.precio_unitario_bonif_desc_sin_iva, dec!(119.7000));
        assert_eq!(calc.subtotal_neto, dec!(119.70));
        assert_eq!(calc.iva_monto, dec!(25.14)); // 119.70 * 0.21 = 25.137 -> 25.14
    }

    #[test]
    fn test_costo_cero_yields_margen_cero() {
        let linea = LineaBase {
            costo: dec!(0),
            margen: dec!(0),
            precio_unitario_final: Some(dec!(12.10)),
            ..linea_simple()
        };
        let calc = calcular_linea(&linea, DescuentosCabecera::default()).unwrap();
        assert_eq!(calc.margen_porcentaje, dec!(0));
        assert_eq!(calc.margen_monto, dec!(10.000));
    }

    #[test]
    fn test_cantidad_negativa_rejected() {
        let linea = LineaBase {
            cantidad: dec!(-1),
            ..linea_simple()
        };
        assert!(matches!(
            calcular_linea(&linea, DescuentosCabecera::default()),
            Err(CalculoError::CantidadNegativa { orden: 1, .. })
        ));
    }

    #[test]
    fn test_alicuota_negativa_rejected() {
        let linea = LineaBase {
            ali_porce: dec!(-21),
            ..linea_simple()
        };
        assert!(matches!(
            calcular_linea(&linea, DescuentosCabecera::default()),
            Err(CalculoError::AlicuotaInvalida(_))
        ));
    }

    #[test]
    fn test_intermediate_rounding_at_four_decimals() {
        // 9.99 / 1.21 = 8.256198... -> 8.2562
        let linea = LineaBase {
            precio_unitario_final: Some(dec!(9.99)),
            ..linea_simple()
        };
        let calc = calcular_linea(&linea, DescuentosCabecera::default()).unwrap();
        assert_eq!(calc.precio_unitario_sin_iva, dec!(8.2562));
        // subtotal for qty 3: 8.2562 * 3 = 24.7686 -> 24.77
        let linea3 = LineaBase {
            cantidad: dec!(3),
            ..linea
        };
        let calc3 = calcular_linea(&linea3, DescuentosCabecera::default()).unwrap();
        assert_eq!(calc3.subtotal_neto, dec!(24.77));
    }
}
