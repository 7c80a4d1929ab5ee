//! WSFEv1: CAE solicitation and last-authorized-number queries.

use chrono::NaiveDate;
use tracing::{debug, info};

use ferredesk_core::arca::{AlicIva, CbteAsocPayload, PayloadArca};

use crate::error::{ArcaError, EventoArca};
use crate::wsaa::Credencial;
use crate::xml::{extraer_bloques, extraer_tag};

const WSFE_HOM: &str = "https://wswhomo.afip.gov.ar/wsfev1/service.asmx";
const WSFE_PROD: &str = "https://servicios1.afip.gov.ar/wsfev1/service.asmx";
const SOAP_NS: &str = "http://ar.gov.afip.dif.FEV1/";

/// Outcome of an approved `FECAESolicitar`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RespuestaCae {
    pub cae: String,
    pub vencimiento: NaiveDate,
    /// Approvals may still carry observations; they are surfaced verbatim.
    pub observaciones: Vec<EventoArca>,
}

pub(crate) const fn endpoint(modo: ferredesk_shared::config::ModoArca) -> &'static str {
    match modo {
        ferredesk_shared::config::ModoArca::Hom => WSFE_HOM,
        ferredesk_shared::config::ModoArca::Prod => WSFE_PROD,
    }
}

pub(crate) async fn solicitar_cae(
    http: &reqwest::Client,
    endpoint: &str,
    cred: &Credencial,
    pto_vta: u32,
    cbte_tipo: u32,
    payload: &PayloadArca,
) -> Result<RespuestaCae, ArcaError> {
    let envelope = armar_solicitud_cae(cred, pto_vta, cbte_tipo, payload);
    debug!(cbte_tipo, pto_vta, numero = payload.cbte_desde, "FECAESolicitar");

    let cuerpo = llamar(http, endpoint, "FECAESolicitar", envelope).await?;
    let respuesta = parsear_respuesta_cae(&cuerpo)?;
    info!(cae = %respuesta.cae, vence = %respuesta.vencimiento, "CAE otorgado");
    Ok(respuesta)
}

pub(crate) async fn ultimo_autorizado(
    http: &reqwest::Client,
    endpoint: &str,
    cred: &Credencial,
    pto_vta: u32,
    cbte_tipo: u32,
) -> Result<u64, ArcaError> {
    let envelope = armar_consulta_ultimo(cred, pto_vta, cbte_tipo);
    let cuerpo = llamar(http, endpoint, "FECompUltimoAutorizado", envelope).await?;
    parsear_ultimo(&cuerpo)
}

async fn llamar(
    http: &reqwest::Client,
    endpoint: &str,
    accion: &str,
    envelope: String,
) -> Result<String, ArcaError> {
    let respuesta = http
        .post(endpoint)
        .header("Content-Type", "text/xml; charset=utf-8")
        .header("SOAPAction", format!("\"{SOAP_NS}{accion}\""))
        .body(envelope)
        .send()
        .await?;
    Ok(respuesta.text().await?)
}

fn abrir_envelope(interior: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ar="{SOAP_NS}"><soapenv:Header/><soapenv:Body>{interior}</soapenv:Body></soapenv:Envelope>"#
    )
}

fn bloque_auth(cred: &Credencial) -> String {
    format!(
        "<ar:Auth><ar:Token>{}</ar:Token><ar:Sign>{}</ar:Sign><ar:Cuit>{}</ar:Cuit></ar:Auth>",
        cred.token, cred.sign, cred.cuit
    )
}

fn bloque_iva(alicuotas: &[AlicIva]) -> String {
    let entradas: String = alicuotas
        .iter()
        .map(|a| {
            format!(
                "<ar:AlicIva><ar:Id>{}</ar:Id><ar:BaseImp>{}</ar:BaseImp><ar:Importe>{}</ar:Importe></ar:AlicIva>",
                a.id, a.base_imp, a.importe
            )
        })
        .collect();
    format!("<ar:Iva>{entradas}</ar:Iva>")
}

fn bloque_asociados(asociados: &[CbteAsocPayload]) -> String {
    let entradas: String = asociados
        .iter()
        .map(|c| {
            let cuit = c
                .cuit
                .map(|n| format!("<ar:Cuit>{n}</ar:Cuit>"))
                .unwrap_or_default();
            format!(
                "<ar:CbteAsoc><ar:Tipo>{}</ar:Tipo><ar:PtoVta>{}</ar:PtoVta><ar:Nro>{}</ar:Nro>{cuit}<ar:CbteFch>{}</ar:CbteFch></ar:CbteAsoc>",
                c.tipo, c.pto_vta, c.nro, c.cbte_fch
            )
        })
        .collect();
    format!("<ar:CbtesAsoc>{entradas}</ar:CbtesAsoc>")
}

fn armar_solicitud_cae(
    cred: &Credencial,
    pto_vta: u32,
    cbte_tipo: u32,
    p: &PayloadArca,
) -> String {
    let iva = p.iva.as_deref().map(bloque_iva).unwrap_or_default();
    let asociados = p.cbtes_asoc.as_deref().map(bloque_asociados).unwrap_or_default();

    let detalle = format!(
        "<ar:FECAEDetRequest>\
         <ar:Concepto>{}</ar:Concepto>\
         <ar:DocTipo>{}</ar:DocTipo>\
         <ar:DocNro>{}</ar:DocNro>\
         <ar:CbteDesde>{}</ar:CbteDesde>\
         <ar:CbteHasta>{}</ar:CbteHasta>\
         <ar:CbteFch>{}</ar:CbteFch>\
         <ar:ImpTotal>{}</ar:ImpTotal>\
         <ar:ImpTotConc>{}</ar:ImpTotConc>\
         <ar:ImpNeto>{}</ar:ImpNeto>\
         <ar:ImpOpEx>{}</ar:ImpOpEx>\
         <ar:ImpTrib>{}</ar:ImpTrib>\
         <ar:ImpIVA>{}</ar:ImpIVA>\
         <ar:MonId>{}</ar:MonId>\
         <ar:MonCotiz>{}</ar:MonCotiz>\
         <ar:CondicionIVAReceptorId>{}</ar:CondicionIVAReceptorId>\
         {asociados}{iva}\
         </ar:FECAEDetRequest>",
        p.concepto,
        p.doc_tipo,
        p.doc_nro,
        p.cbte_desde,
        p.cbte_hasta,
        p.cbte_fch,
        p.imp_total,
        p.imp_tot_conc,
        p.imp_neto,
        p.imp_op_ex,
        p.imp_trib,
        p.imp_iva,
        p.mon_id,
        p.mon_cotiz,
        p.condicion_iva_receptor_id,
    );

    abrir_envelope(&format!(
        "<ar:FECAESolicitar>{}<ar:FeCAEReq>\
         <ar:FeCabReq><ar:CantReg>1</ar:CantReg><ar:PtoVta>{pto_vta}</ar:PtoVta><ar:CbteTipo>{cbte_tipo}</ar:CbteTipo></ar:FeCabReq>\
         <ar:FeDetReq>{detalle}</ar:FeDetReq>\
         </ar:FeCAEReq></ar:FECAESolicitar>",
        bloque_auth(cred)
    ))
}

fn armar_consulta_ultimo(cred: &Credencial, pto_vta: u32, cbte_tipo: u32) -> String {
    abrir_envelope(&format!(
        "<ar:FECompUltimoAutorizado>{}<ar:PtoVta>{pto_vta}</ar:PtoVta><ar:CbteTipo>{cbte_tipo}</ar:CbteTipo></ar:FECompUltimoAutorizado>",
        bloque_auth(cred)
    ))
}

fn eventos(xml: &str, bloque: &str) -> Vec<EventoArca> {
    extraer_bloques(xml, bloque)
        .iter()
        .map(|b| EventoArca {
            codigo: extraer_tag(b, "Code").unwrap_or_default(),
            mensaje: extraer_tag(b, "Msg").unwrap_or_default(),
        })
        .collect()
}

fn parsear_respuesta_cae(cuerpo: &str) -> Result<RespuestaCae, ArcaError> {
    if let Some(falla) = extraer_tag(cuerpo, "faultstring") {
        return Err(ArcaError::Transporte(format!("SOAP fault: {falla}")));
    }

    let errores = eventos(cuerpo, "Err");
    let observaciones = eventos(cuerpo, "Obs");

    let resultado = extraer_tag(cuerpo, "Resultado")
        .ok_or_else(|| ArcaError::RespuestaInvalida("sin Resultado".to_string()))?;

    match resultado.as_str() {
        "A" => {
            let cae = extraer_tag(cuerpo, "CAE")
                .filter(|c| !c.is_empty())
                .ok_or_else(|| ArcaError::RespuestaInvalida("aprobado sin CAE".to_string()))?;
            let fch_vto = extraer_tag(cuerpo, "CAEFchVto")
                .ok_or_else(|| ArcaError::RespuestaInvalida("aprobado sin CAEFchVto".to_string()))?;
            let vencimiento = NaiveDate::parse_from_str(&fch_vto, "%Y%m%d").map_err(|e| {
                ArcaError::RespuestaInvalida(format!("CAEFchVto inválido '{fch_vto}': {e}"))
            })?;
            Ok(RespuestaCae {
                cae,
                vencimiento,
                observaciones,
            })
        }
        "R" => Err(ArcaError::Rechazo {
            errores,
            observaciones,
        }),
        otro => Err(ArcaError::RespuestaInvalida(format!(
            "Resultado desconocido '{otro}'"
        ))),
    }
}

fn parsear_ultimo(cuerpo: &str) -> Result<u64, ArcaError> {
    if let Some(falla) = extraer_tag(cuerpo, "faultstring") {
        return Err(ArcaError::Transporte(format!("SOAP fault: {falla}")));
    }
    let errores = eventos(cuerpo, "Err");
    if !errores.is_empty() {
        return Err(ArcaError::Rechazo {
            errores,
            observaciones: vec![],
        });
    }
    let numero = extraer_tag(cuerpo, "CbteNro")
        .ok_or_else(|| ArcaError::RespuestaInvalida("sin CbteNro".to_string()))?;
    numero
        .parse()
        .map_err(|e| ArcaError::RespuestaInvalida(format!("CbteNro '{numero}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn credencial() -> Credencial {
        Credencial {
            token: "tok==".into(),
            sign: "sig==".into(),
            cuit: 20_123_456_789,
            expira: Utc::now(),
        }
    }

    fn payload_minimo() -> PayloadArca {
        PayloadArca {
            concepto: 1,
            doc_tipo: 80,
            doc_nro: 30_500_010_912,
            condicion_iva_receptor_id: 1,
            cbte_desde: 43,
            cbte_hasta: 43,
            cbte_fch: "20260314".into(),
            imp_total: dec!(169.40),
            imp_tot_conc: dec!(0),
            imp_neto: dec!(140.00),
            imp_op_ex: dec!(0),
            imp_iva: dec!(29.40),
            imp_trib: dec!(0),
            mon_id: "PES",
            mon_cotiz: dec!(1),
            iva: Some(vec![AlicIva {
                id: 5,
                base_imp: dec!(140.00),
                importe: dec!(29.40),
            }]),
            cbtes_asoc: None,
        }
    }

    #[test]
    fn test_solicitud_cae_shape() {
        let xml = armar_solicitud_cae(&credencial(), 1, 1, &payload_minimo());
        assert!(xml.contains("<ar:CantReg>1</ar:CantReg>"));
        assert!(xml.contains("<ar:CbteTipo>1</ar:CbteTipo>"));
        assert!(xml.contains("<ar:Cuit>20123456789</ar:Cuit>"));
        assert!(xml.contains("<ar:CbteDesde>43</ar:CbteDesde>"));
        assert!(xml.contains("<ar:ImpTotal>169.40</ar:ImpTotal>"));
        assert!(xml.contains("<ar:MonId>PES</ar:MonId>"));
        assert!(xml.contains("<ar:AlicIva><ar:Id>5</ar:Id><ar:BaseImp>140.00</ar:BaseImp><ar:Importe>29.40</ar:Importe></ar:AlicIva>"));
        assert!(!xml.contains("CbtesAsoc"));
    }

    #[test]
    fn test_solicitud_omite_iva_para_c() {
        let mut p = payload_minimo();
        p.iva = None;
        let xml = armar_solicitud_cae(&credencial(), 1, 11, &p);
        assert!(!xml.contains("<ar:Iva>"));
    }

    #[test]
    fn test_respuesta_aprobada() {
        let cuerpo = "<FECAESolicitarResponse><FeCabResp><Resultado>A</Resultado></FeCabResp>\
                      <FECAEDetResponse><CAE>76123456789012</CAE><CAEFchVto>20260324</CAEFchVto></FECAEDetResponse>\
                      </FECAESolicitarResponse>";
        let r = parsear_respuesta_cae(cuerpo).unwrap();
        assert_eq!(r.cae, "76123456789012");
        assert_eq!(r.vencimiento, NaiveDate::from_ymd_opt(2026, 3, 24).unwrap());
        assert!(r.observaciones.is_empty());
    }

    #[test]
    fn test_respuesta_rechazada_con_errores_verbatim() {
        let cuerpo = "<resp><Resultado>R</Resultado>\
                      <Errors><Err><Code>10016</Code><Msg>Campo CbteDesde invalido</Msg></Err></Errors>\
                      <Observaciones><Obs><Code>10048</Code><Msg>Condicion IVA</Msg></Obs></Observaciones></resp>";
        let err = parsear_respuesta_cae(cuerpo).unwrap_err();
        match err {
            ArcaError::Rechazo {
                errores,
                observaciones,
            } => {
                assert_eq!(errores[0].codigo, "10016");
                assert_eq!(errores[0].mensaje, "Campo CbteDesde invalido");
                assert_eq!(observaciones[0].codigo, "10048");
            }
            otro => panic!("se esperaba Rechazo, llegó {otro:?}"),
        }
    }

    #[test]
    fn test_fault_es_transporte() {
        let cuerpo = "<soap:Fault><faultstring>Internal error</faultstring></soap:Fault>";
        assert!(matches!(
            parsear_respuesta_cae(cuerpo),
            Err(ArcaError::Transporte(_))
        ));
    }

    #[test]
    fn test_ultimo_autorizado() {
        let cuerpo = "<FECompUltimoAutorizadoResponse><PtoVta>1</PtoVta><CbteTipo>1</CbteTipo>\
                      <CbteNro>42</CbteNro></FECompUltimoAutorizadoResponse>";
        assert_eq!(parsear_ultimo(cuerpo).unwrap(), 42);
    }

    #[test]
    fn test_nota_incluye_asociados() {
        let mut p = payload_minimo();
        p.cbtes_asoc = Some(vec![CbteAsocPayload {
            tipo: 1,
            pto_vta: 1,
            nro: 42,
            cbte_fch: "20260310".into(),
            cuit: Some(30_500_010_912),
        }]);
        let xml = armar_solicitud_cae(&credencial(), 1, 3, &p);
        assert!(xml.contains("<ar:CbteAsoc><ar:Tipo>1</ar:Tipo><ar:PtoVta>1</ar:PtoVta><ar:Nro>42</ar:Nro><ar:Cuit>30500010912</ar:Cuit><ar:CbteFch>20260310</ar:CbteFch></ar:CbteAsoc>"));
    }
}
