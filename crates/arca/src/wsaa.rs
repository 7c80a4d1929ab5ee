//! WSAA authentication: login ticket request, CMS signing, token cache.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use ferredesk_shared::config::ModoArca;

use crate::cms::firmar_cms;
use crate::error::ArcaError;
use crate::xml::{desescapar, escapar, extraer_tag};

const WSAA_HOM: &str = "https://wsaahomo.afip.gov.ar/ws/services/LoginCms";
const WSAA_PROD: &str = "https://wsaa.afip.gov.ar/ws/services/LoginCms";

/// Tickets are renewed this long before their stated expiration.
const MARGEN_RENOVACION: Duration = Duration::minutes(2);

/// Tolerated clock skew when validating the ticket the authority returns.
const TOLERANCIA_RELOJ: Duration = Duration::minutes(5);

/// A (Token, Sign) pair valid for one service until `expira`.
#[derive(Debug, Clone)]
pub struct Credencial {
    pub token: String,
    pub sign: String,
    /// CUIT extracted from the ticket's `destination` field.
    pub cuit: u64,
    pub expira: DateTime<Utc>,
}

impl Credencial {
    fn vigente(&self, ahora: DateTime<Utc>) -> bool {
        ahora + MARGEN_RENOVACION < self.expira
    }
}

/// WSAA client with a per-service credential cache.
///
/// The mutex is coarse on purpose: at most one login request may be in
/// flight per process, because the authority rejects a second ticket while
/// the first is alive (`coe.alreadyAuthenticated`).
pub struct Wsaa {
    http: reqwest::Client,
    endpoint: &'static str,
    certificado_pem: String,
    clave_privada_pem: String,
    cache: Mutex<HashMap<String, Credencial>>,
}

impl Wsaa {
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        modo: ModoArca,
        certificado_pem: String,
        clave_privada_pem: String,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint(modo),
            certificado_pem,
            clave_privada_pem,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Returns a valid credential for `servicio`, logging in when the
    /// cached one is missing or close to expiration.
    ///
    /// # Errors
    ///
    /// Propagates credential, authentication and transport failures.
    pub async fn credencial(&self, servicio: &str) -> Result<Credencial, ArcaError> {
        let mut cache = self.cache.lock().await;
        let ahora = Utc::now();

        if let Some(cred) = cache.get(servicio)
            && cred.vigente(ahora)
        {
            return Ok(cred.clone());
        }

        debug!(servicio, "solicitando ticket de acceso a WSAA");
        match self.login(servicio, ahora).await {
            Ok(cred) => {
                info!(servicio, expira = %cred.expira, "ticket WSAA obtenido");
                cache.insert(servicio.to_string(), cred.clone());
                Ok(cred)
            }
            // An unexpired ticket already exists server-side. Whatever we
            // still hold locally remains usable until it expires.
            Err(ArcaError::Auth(msg)) if msg.contains("coe.alreadyAuthenticated") => {
                if let Some(cred) = cache.get(servicio).filter(|c| c.expira > ahora) {
                    warn!(servicio, "WSAA reporta ticket vigente, se reutiliza el cacheado");
                    return Ok(cred.clone());
                }
                Err(ArcaError::Auth(
                    "WSAA reporta un ticket vigente pero no hay credencial local; \
                     esperar a que expire antes de reintentar"
                        .to_string(),
                ))
            }
            Err(e) => Err(e),
        }
    }

    async fn login(&self, servicio: &str, ahora: DateTime<Utc>) -> Result<Credencial, ArcaError> {
        let tra = armar_tra(servicio, ahora);
        let cms = firmar_cms(&self.certificado_pem, &self.clave_privada_pem, tra.as_bytes())?;
        let cms_b64 = BASE64.encode(&cms);

        let envelope = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:wsaa="http://wsaa.view.sua.dvadac.desein.afip.gov"><soapenv:Header/><soapenv:Body><wsaa:loginCms><wsaa:in0>{cms_b64}</wsaa:in0></wsaa:loginCms></soapenv:Body></soapenv:Envelope>"#
        );

        let respuesta = self
            .http
            .post(self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", "\"\"")
            .body(envelope)
            .send()
            .await?;

        let cuerpo = respuesta.text().await?;

        if let Some(falla) = extraer_tag(&cuerpo, "faultstring") {
            return Err(ArcaError::Auth(falla));
        }

        let ta = extraer_tag(&cuerpo, "loginCmsReturn")
            .ok_or_else(|| ArcaError::Auth("respuesta WSAA sin loginCmsReturn".to_string()))?;

        parsear_ta(&desescapar(&ta), ahora)
    }
}

const fn endpoint(modo: ModoArca) -> &'static str {
    match modo {
        ModoArca::Hom => WSAA_HOM,
        ModoArca::Prod => WSAA_PROD,
    }
}

/// Builds the `loginTicketRequest` XML. Generation backdated 60 seconds,
/// expiration 10 minutes out, per the authority's tolerance window.
#[must_use]
pub fn armar_tra(servicio: &str, ahora: DateTime<Utc>) -> String {
    let unique_id = ahora.timestamp();
    let generacion = (ahora - Duration::seconds(60)).format("%Y-%m-%dT%H:%M:%S%:z");
    let expiracion = (ahora + Duration::minutes(10)).format("%Y-%m-%dT%H:%M:%S%:z");
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><loginTicketRequest version="1.0"><header><uniqueId>{unique_id}</uniqueId><generationTime>{generacion}</generationTime><expirationTime>{expiracion}</expirationTime></header><service>{}</service></loginTicketRequest>"#,
        escapar(servicio)
    )
}

/// Parses the unescaped `loginTicketResponse`, validating its expiration
/// against the local clock. A ticket that arrives already expired (or
/// dated absurdly in the future) means the local clock is skewed.
fn parsear_ta(ta: &str, ahora: DateTime<Utc>) -> Result<Credencial, ArcaError> {
    let token = extraer_tag(ta, "token")
        .ok_or_else(|| ArcaError::Auth("ticket sin token".to_string()))?;
    let sign =
        extraer_tag(ta, "sign").ok_or_else(|| ArcaError::Auth("ticket sin sign".to_string()))?;
    let destino = extraer_tag(ta, "destination")
        .ok_or_else(|| ArcaError::Auth("ticket sin destination".to_string()))?;
    let expiracion = extraer_tag(ta, "expirationTime")
        .ok_or_else(|| ArcaError::Auth("ticket sin expirationTime".to_string()))?;

    let expira = DateTime::parse_from_rfc3339(&expiracion)
        .map_err(|e| ArcaError::Auth(format!("expirationTime inválido '{expiracion}': {e}")))?
        .with_timezone(&Utc);

    if expira <= ahora {
        return Err(ArcaError::Auth(format!(
            "el ticket recibido ya está vencido ({expira}); verificar el reloj del sistema"
        )));
    }
    if expira > ahora + Duration::hours(13) + TOLERANCIA_RELOJ {
        return Err(ArcaError::Auth(format!(
            "expiración del ticket fuera de rango ({expira}); verificar el reloj del sistema"
        )));
    }

    let cuit = extraer_cuit(&destino).ok_or_else(|| {
        ArcaError::Auth(format!("no se pudo extraer el CUIT de destination '{destino}'"))
    })?;

    Ok(Credencial {
        token,
        sign,
        cuit,
        expira,
    })
}

/// `destination` looks like `SERIALNUMBER=CUIT 20123456789, CN=ferredesk`.
fn extraer_cuit(destino: &str) -> Option<u64> {
    let pos = destino.find("CUIT")?;
    let digitos: String = destino[pos..]
        .chars()
        .filter(char::is_ascii_digit)
        .take(11)
        .collect();
    if digitos.len() == 11 {
        digitos.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ahora_fija() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T12:00:00-03:00")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_tra_shape() {
        let tra = armar_tra("wsfe", ahora_fija());
        assert!(tra.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><loginTicketRequest"#));
        assert!(tra.contains("<service>wsfe</service>"));
        assert!(tra.contains(&format!("<uniqueId>{}</uniqueId>", ahora_fija().timestamp())));
        // Generation is backdated a minute, expiration ten minutes ahead.
        assert!(tra.contains("<generationTime>2026-03-14T14:59:00+00:00</generationTime>"));
        assert!(tra.contains("<expirationTime>2026-03-14T15:10:00+00:00</expirationTime>"));
    }

    fn ta_fixture(expiracion: &str) -> String {
        format!(
            "<loginTicketResponse><header><destination>SERIALNUMBER=CUIT 20123456789, CN=ferredesk</destination>\
             <expirationTime>{expiracion}</expirationTime></header>\
             <credentials><token>tok==</token><sign>sig==</sign></credentials></loginTicketResponse>"
        )
    }

    #[test]
    fn test_parsear_ta() {
        let cred = parsear_ta(&ta_fixture("2026-03-14T23:59:00-03:00"), ahora_fija()).unwrap();
        assert_eq!(cred.token, "tok==");
        assert_eq!(cred.sign, "sig==");
        assert_eq!(cred.cuit, 20_123_456_789);
        assert!(cred.vigente(ahora_fija()));
    }

    #[test]
    fn test_ta_vencido_es_error_de_reloj() {
        let err = parsear_ta(&ta_fixture("2026-03-14T10:00:00-03:00"), ahora_fija()).unwrap_err();
        assert!(matches!(err, ArcaError::Auth(msg) if msg.contains("reloj")));
    }

    #[test]
    fn test_ta_futuro_absurdo_es_error_de_reloj() {
        let err = parsear_ta(&ta_fixture("2026-03-16T10:00:00-03:00"), ahora_fija()).unwrap_err();
        assert!(matches!(err, ArcaError::Auth(msg) if msg.contains("reloj")));
    }

    #[test]
    fn test_extraer_cuit_tolerante_a_formato() {
        assert_eq!(
            extraer_cuit("SERIALNUMBER=CUIT 20-12345678-9, CN=x"),
            Some(20_123_456_789)
        );
        assert_eq!(extraer_cuit("CN=sin-cuit"), None);
    }
}
