//! Fiscal QR deep-link generation.
//!
//! AFIP publishes a verification page that takes a base64-url-encoded JSON
//! payload in the `p` query parameter. The JSON is built by hand to keep the
//! key order and the minimal `,`/`:` separators stable across releases; the
//! payload is persisted on the venta verbatim.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Base URL of AFIP's public verification page.
pub const URL_BASE_QR: &str = "https://servicioscf.afip.gob.ar/publico/comprobantes/cae.aspx";

/// Inputs for the QR payload.
#[derive(Debug, Clone)]
pub struct DatosQr {
    /// Issue date of the document.
    pub fecha: NaiveDate,
    /// Issuer CUIT (digits).
    pub cuit_emisor: u64,
    /// Point of sale.
    pub punto_venta: u32,
    /// AFIP document type code.
    pub tipo_cmp: u32,
    /// Document number.
    pub nro_cmp: u64,
    /// Document total.
    pub importe: Decimal,
    /// Receptor document type (80/96/99).
    pub tipo_doc_receptor: u32,
    /// Receptor document number (0 for Consumidor Final).
    pub nro_doc_receptor: u64,
    /// CAE as returned by AFIP (separators tolerated).
    pub cae: String,
    /// CAE expiration date.
    pub cae_vencimiento: NaiveDate,
}

/// Serializes the QR JSON payload with the exact field order and separators
/// the verification page expects.
#[must_use]
pub fn payload_qr(datos: &DatosQr) -> String {
    let cae_digits: String = datos.cae.chars().filter(char::is_ascii_digit).collect();
    format!(
        concat!(
            "{{\"ver\":1,\"fecha\":\"{fecha}\",\"cuit\":{cuit},\"ptoVta\":{pto},",
            "\"tipoCmp\":{tipo},\"nroCmp\":{nro},\"importe\":{importe},",
            "\"moneda\":\"PES\",\"ctz\":1,\"tipoDocRec\":{tipo_doc},",
            "\"nroDocRec\":{nro_doc},\"tipoCodAut\":\"E\",\"codAut\":\"{cae}\",",
            "\"fchVto\":\"{vto}\"}}"
        ),
        fecha = datos.fecha.format("%Y%m%d"),
        cuit = datos.cuit_emisor,
        pto = datos.punto_venta,
        tipo = datos.tipo_cmp,
        nro = datos.nro_cmp,
        importe = datos.importe.normalize(),
        tipo_doc = datos.tipo_doc_receptor,
        nro_doc = datos.nro_doc_receptor,
        cae = cae_digits,
        vto = datos.cae_vencimiento.format("%Y%m%d"),
    )
}

/// Builds the full QR URL: base64-url payload appended as `?p=`.
#[must_use]
pub fn url_qr(datos: &DatosQr) -> String {
    let encoded = URL_SAFE.encode(payload_qr(datos));
    format!("{URL_BASE_QR}?p={encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn datos() -> DatosQr {
        DatosQr {
            fecha: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            cuit_emisor: 30_712_345_678,
            punto_venta: 1,
            tipo_cmp: 6,
            nro_cmp: 42,
            importe: dec!(169.40),
            tipo_doc_receptor: 99,
            nro_doc_receptor: 0,
            cae: "75123456789012".into(),
            cae_vencimiento: NaiveDate::from_ymd_opt(2026, 3, 24).unwrap(),
        }
    }

    #[test]
    fn test_payload_exact_shape() {
        let payload = payload_qr(&datos());
        assert_eq!(
            payload,
            "{\"ver\":1,\"fecha\":\"20260314\",\"cuit\":30712345678,\"ptoVta\":1,\
             \"tipoCmp\":6,\"nroCmp\":42,\"importe\":169.4,\"moneda\":\"PES\",\
             \"ctz\":1,\"tipoDocRec\":99,\"nroDocRec\":0,\"tipoCodAut\":\"E\",\
             \"codAut\":\"75123456789012\",\"fchVto\":\"20260324\"}"
        );
    }

    #[test]
    fn test_payload_is_valid_json() {
        let payload = payload_qr(&datos());
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["ver"], 1);
        assert_eq!(value["moneda"], "PES");
        assert_eq!(value["tipoCodAut"], "E");
    }

    #[test]
    fn test_cae_keeps_digits_only() {
        let mut d = datos();
        d.cae = "75-12345678-9012".into();
        let payload = payload_qr(&d);
        assert!(payload.contains("\"codAut\":\"75123456789012\""));
    }

    #[test]
    fn test_url_appends_base64_payload() {
        let url = url_qr(&datos());
        assert!(url.starts_with(
            "https://servicioscf.afip.gob.ar/publico/comprobantes/cae.aspx?p="
        ));
        let encoded = url.split("?p=").nth(1).unwrap();
        let decoded = URL_SAFE.decode(encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), payload_qr(&datos()));
    }
}
