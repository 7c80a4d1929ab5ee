//! CMS/PKCS#7 signing of the WSAA login ticket.
//!
//! WSAA expects the `loginTicketRequest` XML wrapped in a DER-encoded
//! `SignedData` without signed attributes: the RSA signature is computed
//! directly over the XML with SHA-256, the signing certificate travels
//! embedded, and the signer is identified by issuer + serial. The structure
//! is small and fixed, so it is emitted with a handful of DER primitives
//! instead of a full ASN.1 stack.

use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};
use x509_parser::prelude::*;

use crate::error::ArcaError;

const OID_SIGNED_DATA: &[u64] = &[1, 2, 840, 113_549, 1, 7, 2];
const OID_DATA: &[u64] = &[1, 2, 840, 113_549, 1, 7, 1];
const OID_SHA256: &[u64] = &[2, 16, 840, 1, 101, 3, 4, 2, 1];
const OID_RSA: &[u64] = &[1, 2, 840, 113_549, 1, 1, 1];

/// Signs `contenido` and returns the DER `ContentInfo(SignedData)`.
///
/// # Errors
///
/// Returns [`ArcaError::Credenciales`] when the certificate or the private
/// key cannot be parsed, or the RSA signature fails.
pub fn firmar_cms(
    certificado_pem: &str,
    clave_privada_pem: &str,
    contenido: &[u8],
) -> Result<Vec<u8>, ArcaError> {
    let (_, pem_cert) = parse_x509_pem(certificado_pem.as_bytes())
        .map_err(|e| ArcaError::Credenciales(format!("certificado PEM: {e}")))?;
    let cert_der = pem_cert.contents.clone();
    let (_, cert) = parse_x509_certificate(&cert_der)
        .map_err(|e| ArcaError::Credenciales(format!("certificado X.509: {e}")))?;

    let clave = cargar_clave(clave_privada_pem)?;

    let digest = Sha256::digest(contenido);
    let firma = clave
        .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
        .map_err(|e| ArcaError::Credenciales(format!("firma RSA: {e}")))?;

    let alg_sha256 = der::secuencia(&[der::oid(OID_SHA256), der::nulo()].concat());
    let alg_rsa = der::secuencia(&[der::oid(OID_RSA), der::nulo()].concat());

    let issuer_y_serial = der::secuencia(
        &[
            cert.tbs_certificate.issuer.as_raw().to_vec(),
            der::entero(cert.tbs_certificate.raw_serial()),
        ]
        .concat(),
    );

    let signer_info = der::secuencia(
        &[
            der::entero(&[1]),
            issuer_y_serial,
            alg_sha256.clone(),
            alg_rsa,
            der::octetos(&firma),
        ]
        .concat(),
    );

    let encap_content_info = der::secuencia(
        &[
            der::oid(OID_DATA),
            der::contexto(0, &der::octetos(contenido)),
        ]
        .concat(),
    );

    let signed_data = der::secuencia(
        &[
            der::entero(&[1]),
            der::conjunto(&alg_sha256),
            encap_content_info,
            der::contexto(0, &cert_der),
            der::conjunto(&signer_info),
        ]
        .concat(),
    );

    Ok(der::secuencia(
        &[der::oid(OID_SIGNED_DATA), der::contexto(0, &signed_data)].concat(),
    ))
}

fn cargar_clave(pem: &str) -> Result<RsaPrivateKey, ArcaError> {
    RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| ArcaError::Credenciales(format!("clave privada: {e}")))
}

/// DER emission primitives. Tags and length forms per X.690.
mod der {
    /// Encodes a definite length (short form under 128, long form above).
    fn longitud(len: usize) -> Vec<u8> {
        if len < 128 {
            return vec![u8::try_from(len).unwrap_or(0)];
        }
        let bytes: Vec<u8> = len.to_be_bytes().iter().copied().skip_while(|b| *b == 0).collect();
        let mut salida = Vec::with_capacity(1 + bytes.len());
        salida.push(0x80 | u8::try_from(bytes.len()).unwrap_or(0));
        salida.extend_from_slice(&bytes);
        salida
    }

    fn tlv(tag: u8, contenido: &[u8]) -> Vec<u8> {
        let mut salida = Vec::with_capacity(2 + contenido.len());
        salida.push(tag);
        salida.extend(longitud(contenido.len()));
        salida.extend_from_slice(contenido);
        salida
    }

    pub fn secuencia(contenido: &[u8]) -> Vec<u8> {
        tlv(0x30, contenido)
    }

    pub fn conjunto(contenido: &[u8]) -> Vec<u8> {
        tlv(0x31, contenido)
    }

    /// Context-specific constructed tag `[n]`.
    pub fn contexto(n: u8, contenido: &[u8]) -> Vec<u8> {
        tlv(0xA0 | n, contenido)
    }

    pub fn entero(contenido: &[u8]) -> Vec<u8> {
        tlv(0x02, contenido)
    }

    pub fn octetos(contenido: &[u8]) -> Vec<u8> {
        tlv(0x04, contenido)
    }

    pub fn nulo() -> Vec<u8> {
        vec![0x05, 0x00]
    }

    /// OBJECT IDENTIFIER from its arcs.
    pub fn oid(arcos: &[u64]) -> Vec<u8> {
        let mut cuerpo = Vec::new();
        if arcos.len() >= 2 {
            cuerpo.extend(base128(arcos[0] * 40 + arcos[1]));
            for arco in &arcos[2..] {
                cuerpo.extend(base128(*arco));
            }
        }
        tlv(0x06, &cuerpo)
    }

    fn base128(mut valor: u64) -> Vec<u8> {
        let mut bytes = vec![u8::try_from(valor & 0x7F).unwrap_or(0)];
        valor >>= 7;
        while valor > 0 {
            bytes.push(0x80 | u8::try_from(valor & 0x7F).unwrap_or(0));
            valor >>= 7;
        }
        bytes.reverse();
        bytes
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_longitud_corta_y_larga() {
            assert_eq!(longitud(0), vec![0x00]);
            assert_eq!(longitud(127), vec![0x7F]);
            assert_eq!(longitud(128), vec![0x81, 0x80]);
            assert_eq!(longitud(256), vec![0x82, 0x01, 0x00]);
            assert_eq!(longitud(65536), vec![0x83, 0x01, 0x00, 0x00]);
        }

        #[test]
        fn test_oid_sha256_bytes_conocidos() {
            assert_eq!(
                oid(&[2, 16, 840, 1, 101, 3, 4, 2, 1]),
                vec![0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01]
            );
        }

        #[test]
        fn test_oid_signed_data_bytes_conocidos() {
            assert_eq!(
                oid(&[1, 2, 840, 113_549, 1, 7, 2]),
                vec![0x06, 0x09, 0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x07, 0x02]
            );
        }

        #[test]
        fn test_secuencia_anidada() {
            let interna = entero(&[1]);
            let externa = secuencia(&interna);
            assert_eq!(externa, vec![0x30, 0x03, 0x02, 0x01, 0x01]);
        }

        #[test]
        fn test_contexto_explicito() {
            assert_eq!(contexto(0, &nulo()), vec![0xA0, 0x02, 0x05, 0x00]);
        }
    }
}
