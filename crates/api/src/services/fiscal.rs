//! Adapter binding the SOAP client to the fiscal-authority seam.

use std::sync::Arc;

use ferredesk_arca::ArcaClient;
use ferredesk_core::arca::PayloadArca;
use ferredesk_db::repositories::venta::CaeOtorgado;
use ferredesk_db::AutoridadFiscal;
use ferredesk_shared::error::AppError;

/// The production fiscal authority: WSAA + WSFEv1 over HTTPS.
pub struct AutoridadArca(pub Arc<ArcaClient>);

#[async_trait::async_trait]
impl AutoridadFiscal for AutoridadArca {
    async fn ultimo_autorizado(&self, punto: u32, cbte_tipo: u32) -> Result<u64, AppError> {
        Ok(self.0.ultimo_autorizado(punto, cbte_tipo).await?)
    }

    async fn solicitar_cae(
        &self,
        punto: u32,
        cbte_tipo: u32,
        payload: &PayloadArca,
    ) -> Result<CaeOtorgado, AppError> {
        let respuesta = self.0.solicitar_cae(punto, cbte_tipo, payload).await?;
        for obs in &respuesta.observaciones {
            tracing::warn!(codigo = %obs.codigo, mensaje = %obs.mensaje, "observación de ARCA");
        }
        Ok(CaeOtorgado {
            cae: respuesta.cae,
            vencimiento: respuesta.vencimiento,
        })
    }
}
