//! `FECAESolicitar` payload assembly (`armar_payload_arca`).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculo::DocumentoCalculado;

use super::error::PayloadError;

/// AFIP document types for the receptor.
pub const DOC_TIPO_CUIT: u32 = 80;
/// DNI.
pub const DOC_TIPO_DNI: u32 = 96;
/// Consumidor Final.
pub const DOC_TIPO_CONSUMIDOR_FINAL: u32 = 99;

/// Receptor identity snapshot taken from the customer at issuance.
#[derive(Debug, Clone, Default)]
pub struct DatosReceptor {
    /// CUIT, as stored (separators tolerated).
    pub cuit: Option<String>,
    /// DNI, as stored.
    pub dni: Option<String>,
    /// The customer's `TipoIVA.id`, when known.
    pub tipo_iva_id: Option<u32>,
}

/// One associated factura for a nota de crédito/débito.
#[derive(Debug, Clone)]
pub struct CbteAsociado {
    /// AFIP type of the original factura.
    pub tipo: u32,
    /// Point of sale of the original factura.
    pub pto_vta: u32,
    /// Number of the original factura.
    pub nro: u64,
    /// Issue date of the original factura.
    pub fecha: NaiveDate,
    /// DocTipo the original factura was emitted with.
    pub doc_tipo: u32,
    /// CUIT of the original factura's receptor, when it had one.
    pub cuit: Option<String>,
}

/// One `AlicIva` entry of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlicIva {
    /// AFIP rate id.
    #[serde(rename = "Id")]
    pub id: u32,
    /// Taxed net amount.
    #[serde(rename = "BaseImp")]
    pub base_imp: Decimal,
    /// IVA amount.
    #[serde(rename = "Importe")]
    pub importe: Decimal,
}

/// One `CbtesAsoc` entry of the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CbteAsocPayload {
    /// Original factura AFIP type.
    #[serde(rename = "Tipo")]
    pub tipo: u32,
    /// Original point of sale.
    #[serde(rename = "PtoVta")]
    pub pto_vta: u32,
    /// Original number.
    #[serde(rename = "Nro")]
    pub nro: u64,
    /// Original issue date, `YYYYMMDD`.
    #[serde(rename = "CbteFch")]
    pub cbte_fch: String,
    /// Original receptor CUIT; present only when the original was not
    /// Consumidor Final.
    #[serde(rename = "Cuit", skip_serializing_if = "Option::is_none")]
    pub cuit: Option<u64>,
}

/// The `FECAEDetRequest` body sent to `FECAESolicitar`.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadArca {
    /// Always 1 (products).
    #[serde(rename = "Concepto")]
    pub concepto: u32,
    /// Receptor document type (80 CUIT / 96 DNI / 99 CF).
    #[serde(rename = "DocTipo")]
    pub doc_tipo: u32,
    /// Receptor document number (0 for CF).
    #[serde(rename = "DocNro")]
    pub doc_nro: u64,
    /// Receptor IVA condition id.
    #[serde(rename = "CondicionIVAReceptorId")]
    pub condicion_iva_receptor_id: u32,
    /// First number of the batch (always equal to `cbte_hasta`).
    #[serde(rename = "CbteDesde")]
    pub cbte_desde: u64,
    /// Last number of the batch.
    #[serde(rename = "CbteHasta")]
    pub cbte_hasta: u64,
    /// Issue date, `YYYYMMDD`.
    #[serde(rename = "CbteFch")]
    pub cbte_fch: String,
    /// Total amount.
    #[serde(rename = "ImpTotal")]
    pub imp_total: Decimal,
    /// Untaxed concepts (always 0 here).
    #[serde(rename = "ImpTotConc")]
    pub imp_tot_conc: Decimal,
    /// Net taxed amount.
    #[serde(rename = "ImpNeto")]
    pub imp_neto: Decimal,
    /// Exempt amount (always 0 here).
    #[serde(rename = "ImpOpEx")]
    pub imp_op_ex: Decimal,
    /// IVA amount.
    #[serde(rename = "ImpIVA")]
    pub imp_iva: Decimal,
    /// Other tributes (always 0 here).
    #[serde(rename = "ImpTrib")]
    pub imp_trib: Decimal,
    /// Currency, always `PES`.
    #[serde(rename = "MonId")]
    pub mon_id: &'static str,
    /// Exchange rate, always 1.
    #[serde(rename = "MonCotiz")]
    pub mon_cotiz: Decimal,
    /// VAT breakdown; absent for type C and for zero-total type B.
    #[serde(rename = "Iva", skip_serializing_if = "Option::is_none")]
    pub iva: Option<Vec<AlicIva>>,
    /// Associated facturas; present only for notas.
    #[serde(rename = "CbtesAsoc", skip_serializing_if = "Option::is_none")]
    pub cbtes_asoc: Option<Vec<CbteAsocPayload>>,
}

/// Maps the customer's `TipoIVA.id` to AFIP's `CondicionIVAReceptorId`.
///
/// The identity holds for the canonical set {1, 4, 5, 6, 13, 16}; anything
/// else defaults to 5 (Consumidor Final). This mapping must be preserved
/// verbatim.
#[must_use]
pub fn condicion_iva_receptor(tipo_iva_id: Option<u32>) -> u32 {
    match tipo_iva_id {
        Some(id @ (1 | 4 | 5 | 6 | 13 | 16)) => id,
        _ => 5,
    }
}

/// Maps an IVA percentage to its AFIP alícuota id.
///
/// # Errors
///
/// Returns an error for percentages outside the AFIP table.
pub fn codigo_alicuota_afip(porcentaje: Decimal) -> Result<u32, PayloadError> {
    // {0 -> 3, 2.5 -> 9, 5 -> 8, 10.5 -> 4, 21 -> 5, 27 -> 6}
    let tabla: [(Decimal, u32); 6] = [
        (Decimal::ZERO, 3),
        (Decimal::new(25, 1), 9),
        (Decimal::new(5, 0), 8),
        (Decimal::new(105, 1), 4),
        (Decimal::new(21, 0), 5),
        (Decimal::new(27, 0), 6),
    ];
    tabla
        .iter()
        .find(|(p, _)| porcentaje == *p)
        .map(|(_, id)| *id)
        .ok_or(PayloadError::AlicuotaSinCodigo(porcentaje))
}

/// AFIP codes for type A documents (factura and notas).
const TIPOS_A: [u32; 3] = [1, 2, 3];
/// AFIP codes for type B.
const TIPOS_B: [u32; 3] = [6, 7, 8];
/// AFIP codes for type C.
const TIPOS_C: [u32; 3] = [11, 12, 13];
/// AFIP codes that are notas and must carry `CbtesAsoc`.
const TIPOS_NOTA: [u32; 6] = [2, 3, 7, 8, 12, 13];

fn solo_digitos(doc: &str) -> Result<u64, PayloadError> {
    let digits: String = doc.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(PayloadError::DocumentoInvalido(doc.to_string()));
    }
    digits
        .parse::<u64>()
        .map_err(|_| PayloadError::DocumentoInvalido(doc.to_string()))
}

/// Builds the `FECAESolicitar` detail payload for one fiscal document.
///
/// # Errors
///
/// Returns an error when the comprobante code is not fiscal, a type A
/// document lacks a CUIT, a nota carries no association, or an IVA rate
/// has no AFIP id.
pub fn armar_payload_arca(
    cbte_tipo: u32,
    punto_venta: u32,
    numero: u64,
    fecha: NaiveDate,
    receptor: &DatosReceptor,
    doc: &DocumentoCalculado,
    asociados: &[CbteAsociado],
) -> Result<PayloadArca, PayloadError> {
    let es_a = TIPOS_A.contains(&cbte_tipo);
    let es_b = TIPOS_B.contains(&cbte_tipo);
    let es_c = TIPOS_C.contains(&cbte_tipo);
    if !(es_a || es_b || es_c) {
        return Err(PayloadError::TipoNoSoportado(cbte_tipo));
    }
    // `punto_venta` travels in FeCabReq; it is threaded through the transport
    // layer together with this payload.
    let _ = punto_venta;

    // Receptor document selection.
    let (doc_tipo, doc_nro) = match (&receptor.cuit, &receptor.dni) {
        (Some(cuit), _) if !cuit.trim().is_empty() => (DOC_TIPO_CUIT, solo_digitos(cuit)?),
        _ if es_a => return Err(PayloadError::CuitRequerido(cbte_tipo)),
        (_, Some(dni)) if !dni.trim().is_empty() => (DOC_TIPO_DNI, solo_digitos(dni)?),
        _ => (DOC_TIPO_CONSUMIDOR_FINAL, 0),
    };

    // Amounts per letter.
    let (imp_neto, imp_iva, imp_total) = if es_c {
        (doc.ven_total, Decimal::ZERO, doc.ven_total)
    } else {
        (doc.ven_impneto, doc.iva_global, doc.ven_total)
    };

    // VAT breakdown: never for C; omitted for B when the total is zero.
    let iva = if es_c || (es_b && doc.ven_total == Decimal::ZERO) || doc.alicuotas.is_empty() {
        None
    } else {
        let entradas = doc
            .alicuotas
            .iter()
            .map(|bucket| {
                Ok(AlicIva {
                    id: codigo_alicuota_afip(bucket.porcentaje)?,
                    base_imp: bucket.neto_gravado,
                    importe: bucket.iva_total,
                })
            })
            .collect::<Result<Vec<_>, PayloadError>>()?;
        Some(entradas)
    };

    // Associations: mandatory for notas, absent otherwise.
    let cbtes_asoc = if TIPOS_NOTA.contains(&cbte_tipo) {
        if asociados.is_empty() {
            return Err(PayloadError::NotaSinAsociacion(cbte_tipo));
        }
        let entradas = asociados
            .iter()
            .map(|asoc| {
                let cuit = if asoc.doc_tipo == DOC_TIPO_CONSUMIDOR_FINAL {
                    None
                } else {
                    asoc.cuit.as_deref().map(solo_digitos).transpose()?
                };
                Ok(CbteAsocPayload {
                    tipo: asoc.tipo,
                    pto_vta: asoc.pto_vta,
                    nro: asoc.nro,
                    cbte_fch: asoc.fecha.format("%Y%m%d").to_string(),
                    cuit,
                })
            })
            .collect::<Result<Vec<_>, PayloadError>>()?;
        Some(entradas)
    } else {
        None
    };

    Ok(PayloadArca {
        concepto: 1,
        doc_tipo,
        doc_nro,
        condicion_iva_receptor_id: condicion_iva_receptor(receptor.tipo_iva_id),
        cbte_desde: numero,
        cbte_hasta: numero,
        cbte_fch: fecha.format("%Y%m%d").to_string(),
        imp_total,
        imp_tot_conc: Decimal::ZERO,
        imp_neto,
        imp_op_ex: Decimal::ZERO,
        imp_iva,
        imp_trib: Decimal::ZERO,
        mon_id: "PES",
        mon_cotiz: Decimal::ONE,
        iva,
        cbtes_asoc,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculo::{DescuentosCabecera, LineaBase, calcular_documento};
    use rust_decimal_macros::dec;

    fn doc_simple() -> DocumentoCalculado {
        // costo=100, margen=40, IVA 21%, qty 1 -> neto 140, iva 29.40, total 169.40
        let lineas = [LineaBase {
            orden: 1,
            cantidad: dec!(1),
            costo: dec!(100),
            margen: dec!(40),
            bonifica: dec!(0),
            ali_porce: dec!(21),
            precio_unitario_final: None,
        }];
        calcular_documento(&lineas, DescuentosCabecera::default(), Decimal::ZERO).unwrap()
    }

    fn fecha() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_factura_b_consumidor_final() {
        let receptor = DatosReceptor::default();
        let payload =
            armar_payload_arca(6, 1, 42, fecha(), &receptor, &doc_simple(), &[]).unwrap();

        assert_eq!(payload.doc_tipo, DOC_TIPO_CONSUMIDOR_FINAL);
        assert_eq!(payload.doc_nro, 0);
        assert_eq!(payload.condicion_iva_receptor_id, 5);
        assert_eq!(payload.imp_neto, dec!(140.00));
        assert_eq!(payload.imp_iva, dec!(29.40));
        assert_eq!(payload.imp_total, dec!(169.40));
        assert_eq!(payload.cbte_fch, "20260314");
        assert_eq!(payload.cbte_desde, 42);
        assert_eq!(payload.cbte_hasta, 42);
        let iva = payload.iva.unwrap();
        assert_eq!(
            iva,
            vec![AlicIva {
                id: 5,
                base_imp: dec!(140.00),
                importe: dec!(29.40)
            }]
        );
        assert!(payload.cbtes_asoc.is_none());
    }

    #[test]
    fn test_factura_c_monotributo() {
        let receptor = DatosReceptor::default();
        let payload =
            armar_payload_arca(11, 1, 7, fecha(), &receptor, &doc_simple(), &[]).unwrap();

        assert_eq!(payload.imp_neto, dec!(169.40));
        assert_eq!(payload.imp_iva, Decimal::ZERO);
        assert_eq!(payload.imp_total, dec!(169.40));
        assert!(payload.iva.is_none());
    }

    #[test]
    fn test_factura_a_rejects_without_cuit() {
        let receptor = DatosReceptor {
            dni: Some("30123456".into()),
            ..DatosReceptor::default()
        };
        let err = armar_payload_arca(1, 1, 1, fecha(), &receptor, &doc_simple(), &[]).unwrap_err();
        assert_eq!(err, PayloadError::CuitRequerido(1));
    }

    #[test]
    fn test_factura_a_with_cuit() {
        let receptor = DatosReceptor {
            cuit: Some("20-12345678-6".into()),
            tipo_iva_id: Some(1),
            ..DatosReceptor::default()
        };
        let payload =
            armar_payload_arca(1, 3, 9, fecha(), &receptor, &doc_simple(), &[]).unwrap();
        assert_eq!(payload.doc_tipo, DOC_TIPO_CUIT);
        assert_eq!(payload.doc_nro, 20_123_456_786);
        assert_eq!(payload.condicion_iva_receptor_id, 1);
    }

    #[test]
    fn test_factura_b_prefers_cuit_then_dni() {
        let con_dni = DatosReceptor {
            dni: Some("30123456".into()),
            ..DatosReceptor::default()
        };
        let payload =
            armar_payload_arca(6, 1, 1, fecha(), &con_dni, &doc_simple(), &[]).unwrap();
        assert_eq!(payload.doc_tipo, DOC_TIPO_DNI);
        assert_eq!(payload.doc_nro, 30_123_456);

        let con_ambos = DatosReceptor {
            cuit: Some("27333222111".into()),
            dni: Some("30123456".into()),
            ..DatosReceptor::default()
        };
        let payload =
            armar_payload_arca(6, 1, 1, fecha(), &con_ambos, &doc_simple(), &[]).unwrap();
        assert_eq!(payload.doc_tipo, DOC_TIPO_CUIT);
    }

    #[test]
    fn test_nota_credito_b_carries_asociacion() {
        let receptor = DatosReceptor::default();
        let original = CbteAsociado {
            tipo: 6,
            pto_vta: 1,
            nro: 42,
            fecha: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            doc_tipo: DOC_TIPO_DNI,
            cuit: Some("30123456".into()),
        };
        let payload =
            armar_payload_arca(8, 1, 2, fecha(), &receptor, &doc_simple(), &[original]).unwrap();
        let asoc = payload.cbtes_asoc.unwrap();
        assert_eq!(asoc.len(), 1);
        assert_eq!(asoc[0].tipo, 6);
        assert_eq!(asoc[0].pto_vta, 1);
        assert_eq!(asoc[0].nro, 42);
        assert_eq!(asoc[0].cbte_fch, "20260201");
        // Original used DNI, not Consumidor Final: Cuit field included.
        assert_eq!(asoc[0].cuit, Some(30_123_456));
    }

    #[test]
    fn test_nota_to_consumidor_final_omits_cuit() {
        let receptor = DatosReceptor::default();
        let original = CbteAsociado {
            tipo: 6,
            pto_vta: 1,
            nro: 10,
            fecha: fecha(),
            doc_tipo: DOC_TIPO_CONSUMIDOR_FINAL,
            cuit: None,
        };
        let payload =
            armar_payload_arca(8, 1, 3, fecha(), &receptor, &doc_simple(), &[original]).unwrap();
        assert_eq!(payload.cbtes_asoc.unwrap()[0].cuit, None);
    }

    #[test]
    fn test_nota_without_asociacion_rejected() {
        let err = armar_payload_arca(7, 1, 1, fecha(), &DatosReceptor::default(), &doc_simple(), &[])
            .unwrap_err();
        assert_eq!(err, PayloadError::NotaSinAsociacion(7));
    }

    #[test]
    fn test_non_fiscal_code_rejected() {
        let err = armar_payload_arca(9997, 1, 1, fecha(), &DatosReceptor::default(), &doc_simple(), &[])
            .unwrap_err();
        assert_eq!(err, PayloadError::TipoNoSoportado(9997));
    }

    #[test]
    fn test_condicion_iva_identity_set() {
        for id in [1, 4, 5, 6, 13, 16] {
            assert_eq!(condicion_iva_receptor(Some(id)), id);
        }
        assert_eq!(condicion_iva_receptor(Some(2)), 5);
        assert_eq!(condicion_iva_receptor(Some(99)), 5);
        assert_eq!(condicion_iva_receptor(None), 5);
    }

    #[test]
    fn test_codigo_alicuota_table() {
        assert_eq!(codigo_alicuota_afip(dec!(0)).unwrap(), 3);
        assert_eq!(codigo_alicuota_afip(dec!(2.5)).unwrap(), 9);
        assert_eq!(codigo_alicuota_afip(dec!(5)).unwrap(), 8);
        assert_eq!(codigo_alicuota_afip(dec!(10.5)).unwrap(), 4);
        assert_eq!(codigo_alicuota_afip(dec!(21)).unwrap(), 5);
        assert_eq!(codigo_alicuota_afip(dec!(27)).unwrap(), 6);
        assert!(codigo_alicuota_afip(dec!(15)).is_err());
    }

    #[test]
    fn test_moneda_pesos_cotizacion_uno() {
        let payload = armar_payload_arca(6, 1, 1, fecha(), &DatosReceptor::default(), &doc_simple(), &[])
            .unwrap();
        assert_eq!(payload.mon_id, "PES");
        assert_eq!(payload.mon_cotiz, Decimal::ONE);
        assert_eq!(payload.concepto, 1);
    }
}
