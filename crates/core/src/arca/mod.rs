//! AFIP/ARCA payload assembly: the pure half of the fiscal client.
//!
//! The SOAP transport lives in the `ferredesk-arca` crate; everything that
//! can be derived without I/O (request payloads, receptor document
//! selection, rate id mapping, the QR deep link) lives here so it can be
//! unit-tested against the literal scenarios.

pub mod error;
pub mod payload;
pub mod qr;

pub use error::PayloadError;
pub use payload::{
    AlicIva, CbteAsociado, CbteAsocPayload, DOC_TIPO_CONSUMIDOR_FINAL, DOC_TIPO_CUIT,
    DOC_TIPO_DNI, DatosReceptor, PayloadArca, armar_payload_arca, codigo_alicuota_afip,
    condicion_iva_receptor,
};
pub use qr::{DatosQr, payload_qr, url_qr};
