//! Sales submission orchestrator.
//!
//! Drives the end-to-end emission of one sales document: stock holds,
//! numbering (authority-proposed for fiscal types, local counter for
//! internal ones), persistence, CAE request, QR, reservation confirmation
//! and the caja/auto-imputation tail for cash sales.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{error, info};
use uuid::Uuid;

use ferredesk_core::arca::{
    CbteAsociado, DOC_TIPO_CONSUMIDOR_FINAL, DOC_TIPO_CUIT, DOC_TIPO_DNI, DatosQr, DatosReceptor,
    armar_payload_arca, payload_qr,
};
use ferredesk_core::calculo::DocumentoCalculado;
use ferredesk_core::cc::KindCc;
use ferredesk_core::comprobante::{Letra, TipoComprobante, cbte_tipo};
use ferredesk_db::repositories::{
    CajaRepository, CreateImputacionInput, CreateReservaInput, CreateVentaInput,
    FerreteriaRepository, FormLockRepository, ImputacionRepository, PagoVentaInput,
    ReservaRepository, VentaRepository,
};
use ferredesk_db::{AutoridadFiscal, entities::comprobantes, entities::ventas};
use ferredesk_shared::error::AppError;

/// One payment leg of a cash sale.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PagoInput {
    /// Payment method id from the catalog.
    pub metodo_pago_id: i32,
    /// Paid amount.
    pub monto: Decimal,
}

/// Everything the orchestrator needs to emit one document.
#[derive(Debug, Clone)]
pub struct EmisionInput {
    /// Header and lines.
    pub venta: CreateVentaInput,
    /// Operator issuing the document.
    pub usuario: String,
    /// Cart session already holding reservations; when absent the
    /// orchestrator acquires its own holds for the stocked lines.
    pub reserva_sesion: Option<Uuid>,
    /// Payment legs; non-empty means point-of-sale completion.
    pub pagos: Vec<PagoInput>,
    /// Open register session, required when `pagos` is non-empty.
    pub sesion_caja_id: Option<i32>,
}

/// The emitted document with its derived quantities.
#[derive(Debug, Clone, serde::Serialize)]
pub struct VentaEmitida {
    /// Persisted header.
    pub venta: ventas::Model,
    /// Canonical formatted number.
    pub numero_formateado: String,
    /// Engine output over the stored lines.
    pub calculo: DocumentoCalculado,
    /// QR payload, present for fiscal documents.
    pub qr_payload: Option<String>,
}

/// Sales submission service.
pub struct VentasService {
    db: DatabaseConnection,
    autoridad: Option<Arc<dyn AutoridadFiscal>>,
    ttl_reserva_minutos: i64,
}

impl VentasService {
    /// Creates the service over a connection and the optional authority.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        autoridad: Option<Arc<dyn AutoridadFiscal>>,
        ttl_reserva_minutos: i64,
    ) -> Self {
        Self {
            db,
            autoridad,
            ttl_reserva_minutos,
        }
    }

    /// Emits one sales document end to end.
    ///
    /// Fiscal failure semantics: an authority rejection rolls the persisted
    /// venta back (delete + release holds) so the caller retries after
    /// fixing the data; a transport failure does the same but flags the
    /// response for reconciliation; any failure after the CAE was granted
    /// logs the CAE and its expiration for manual reattachment.
    ///
    /// # Errors
    ///
    /// Returns the taxonomy error matching the failing step.
    pub async fn emitir(&self, input: EmisionInput) -> Result<VentaEmitida, AppError> {
        let comprobante = self.catalogo(&input.venta.comprobante_codigo_afip).await?;
        let tipo = TipoComprobante::from_str(&comprobante.tipo)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let letra = Letra::from_str(&comprobante.letra)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let es_fiscal = tipo.es_fiscal() && letra.es_fiscal();
        let punto = u32::try_from(input.venta.punto)
            .map_err(|_| AppError::Validation("punto de venta inválido".into()))?;

        let reservas = ReservaRepository::new(self.db.clone());
        let (sesion, holds_propios) = match input.reserva_sesion {
            Some(sesion) => (sesion, false),
            None => {
                let sesion = Uuid::new_v4();
                self.adquirir_reservas(&reservas, &input, sesion).await?;
                (sesion, true)
            }
        };

        // Numbering. The authority call happens before any write so a
        // failure here leaves nothing to compensate beyond our own holds.
        let numero_fiscal = if es_fiscal {
            let ct = cbte_tipo(&comprobante.codigo_afip)
                .map_err(|e| AppError::Validation(e.to_string()))?;
            let autoridad = match self.autoridad.as_ref() {
                Some(autoridad) => autoridad,
                None => {
                    self.liberar_holds(&reservas, sesion, holds_propios).await;
                    return Err(AppError::State(
                        "la emisión fiscal está deshabilitada".into(),
                    ));
                }
            };
            match autoridad.ultimo_autorizado(punto, ct).await {
                Ok(ultimo) => Some(i64::try_from(ultimo + 1).map_err(|_| {
                    AppError::Internal("número autorizado fuera de rango".into())
                })?),
                Err(err) => {
                    self.liberar_holds(&reservas, sesion, holds_propios).await;
                    return Err(err);
                }
            }
        } else {
            None
        };

        let repo = VentaRepository::new(self.db.clone());
        let venta = match repo.crear(input.venta.clone(), numero_fiscal).await {
            Ok(venta) => venta,
            Err(err) => {
                self.liberar_holds(&reservas, sesion, holds_propios).await;
                return Err(err.into());
            }
        };
        let calculada = match repo.calculada(venta.id).await {
            Ok(calculada) => calculada,
            Err(err) => {
                repo.eliminar(venta.id).await.ok();
                self.liberar_holds(&reservas, sesion, holds_propios).await;
                return Err(err.into());
            }
        };

        let mut qr = None;
        if es_fiscal {
            match self.autorizar(&repo, &comprobante, &calculada, punto).await {
                Ok(payload) => qr = Some(payload),
                Err(err) => {
                    repo.eliminar(venta.id).await.ok();
                    self.liberar_holds(&reservas, sesion, holds_propios).await;
                    return Err(err);
                }
            }
        }

        // Consume the holds. Past this point the document stands; failures
        // are operator-level and must not undo an already-granted CAE.
        if let Err(err) = reservas.confirmar(sesion, venta.id).await {
            error!(venta_id = venta.id, error = %err, "reservas sin confirmar tras la emisión");
        }

        if !input.pagos.is_empty() {
            self.completar_contado(&input, &calculada.venta, &calculada.calculo).await?;
        }

        info!(
            venta_id = venta.id,
            numero = %calculada.numero_formateado,
            fiscal = es_fiscal,
            "venta emitida"
        );

        // The header was updated by the CAE step; re-read for the response.
        let venta = if es_fiscal {
            repo.calculada(venta.id).await.map(|c| c.venta)?
        } else {
            calculada.venta
        };
        Ok(VentaEmitida {
            venta,
            numero_formateado: calculada.numero_formateado,
            calculo: calculada.calculo,
            qr_payload: qr,
        })
    }

    /// Converts a presupuesto into a fiscal (or internal) document under a
    /// conversion form lock. The lock must already be held by `sesion`.
    ///
    /// # Errors
    ///
    /// Returns an error when the lock is busy, the quote cannot be
    /// converted, or the fiscal steps fail.
    pub async fn convertir(
        &self,
        presupuesto_id: i32,
        codigo_afip_destino: &str,
        usuario: &str,
        sesion: Uuid,
    ) -> Result<VentaEmitida, AppError> {
        let locks = FormLockRepository::new(self.db.clone());
        let lock = locks
            .adquirir(
                "conversion",
                usuario,
                sesion,
                Some(presupuesto_id),
                self.ttl_reserva_minutos,
            )
            .await
            .map_err(AppError::from)?;

        let resultado = self
            .convertir_bajo_lock(presupuesto_id, codigo_afip_destino)
            .await;

        locks.liberar(lock.id, sesion).await.ok();
        resultado
    }

    async fn convertir_bajo_lock(
        &self,
        presupuesto_id: i32,
        codigo_afip_destino: &str,
    ) -> Result<VentaEmitida, AppError> {
        let comprobante = self.catalogo(codigo_afip_destino).await?;
        let tipo = TipoComprobante::from_str(&comprobante.tipo)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let letra = Letra::from_str(&comprobante.letra)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let es_fiscal = tipo.es_fiscal() && letra.es_fiscal();

        let repo = VentaRepository::new(self.db.clone());
        let presupuesto = repo.calculada(presupuesto_id).await.map_err(AppError::from)?;
        let punto = u32::try_from(presupuesto.venta.ven_punto)
            .map_err(|_| AppError::Validation("punto de venta inválido".into()))?;

        let numero_fiscal = if es_fiscal {
            let ct = cbte_tipo(&comprobante.codigo_afip)
                .map_err(|e| AppError::Validation(e.to_string()))?;
            let autoridad = self.autoridad.as_ref().ok_or_else(|| {
                AppError::State("la emisión fiscal está deshabilitada".into())
            })?;
            let ultimo = autoridad.ultimo_autorizado(punto, ct).await?;
            Some(i64::try_from(ultimo + 1).map_err(|_| {
                AppError::Internal("número autorizado fuera de rango".into())
            })?)
        } else {
            None
        };

        let nueva = repo
            .convertir(presupuesto_id, codigo_afip_destino, numero_fiscal)
            .await
            .map_err(AppError::from)?;
        let calculada = repo.calculada(nueva.id).await.map_err(AppError::from)?;

        let mut qr = None;
        if es_fiscal {
            match self.autorizar(&repo, &comprobante, &calculada, punto).await {
                Ok(payload) => qr = Some(payload),
                Err(err) => {
                    // Undo both sides: the new document and the converted
                    // flag on the quote are worthless without a CAE.
                    repo.eliminar(nueva.id).await.ok();
                    self.restaurar_presupuesto(presupuesto_id).await;
                    return Err(err);
                }
            }
        }

        info!(
            presupuesto_id,
            venta_id = nueva.id,
            numero = %calculada.numero_formateado,
            "presupuesto convertido"
        );

        let venta = if es_fiscal {
            repo.calculada(nueva.id).await.map(|c| c.venta)?
        } else {
            calculada.venta
        };
        Ok(VentaEmitida {
            venta,
            numero_formateado: calculada.numero_formateado,
            calculo: calculada.calculo,
            qr_payload: qr,
        })
    }

    async fn adquirir_reservas(
        &self,
        reservas: &ReservaRepository,
        input: &EmisionInput,
        sesion: Uuid,
    ) -> Result<(), AppError> {
        for item in &input.venta.items {
            let (Some(stock_id), Some(proveedor_id)) = (item.idsto, item.idpro) else {
                continue;
            };
            let resultado = reservas
                .crear(CreateReservaInput {
                    stock_id,
                    proveedor_id,
                    cantidad: item.cantidad,
                    usuario: input.usuario.clone(),
                    sesion,
                    ttl_minutos: self.ttl_reserva_minutos,
                })
                .await;
            if let Err(err) = resultado {
                reservas.cancelar(sesion).await.ok();
                return Err(err.into());
            }
        }
        Ok(())
    }

    async fn liberar_holds(&self, reservas: &ReservaRepository, sesion: Uuid, propios: bool) {
        if propios {
            reservas.cancelar(sesion).await.ok();
        }
    }

    /// Fiscal tail: payload, CAE, QR, persisted in that order. Returns the
    /// QR payload on success.
    async fn autorizar(
        &self,
        repo: &VentaRepository,
        comprobante: &comprobantes::Model,
        calculada: &ferredesk_db::repositories::venta::VentaCalculada,
        punto: u32,
    ) -> Result<String, AppError> {
        let venta = &calculada.venta;
        let ct = cbte_tipo(&comprobante.codigo_afip)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let numero = u64::try_from(venta.ven_numero)
            .map_err(|_| AppError::Internal("número de venta inválido".into()))?;

        let receptor = DatosReceptor {
            cuit: venta.cuit.clone(),
            dni: venta.dni.clone(),
            tipo_iva_id: venta.tipo_iva_id.and_then(|id| u32::try_from(id).ok()),
        };
        let asociados = self.asociados(repo, venta.id, calculada.tipo).await?;

        let payload = armar_payload_arca(
            ct,
            punto,
            numero,
            venta.fecha,
            &receptor,
            &calculada.calculo,
            &asociados,
        )
        .map_err(|e| AppError::Validation(e.to_string()))?;

        let autoridad = self
            .autoridad
            .as_ref()
            .ok_or_else(|| AppError::State("la emisión fiscal está deshabilitada".into()))?;
        let cae = autoridad.solicitar_cae(punto, ct, &payload).await?;

        let emisor = FerreteriaRepository::new(self.db.clone())
            .obtener()
            .await
            .map_err(AppError::from)?;
        let cuit_emisor = digitos(&emisor.cuit)
            .ok_or_else(|| AppError::State("CUIT del emisor inválido".into()))?;
        let qr = payload_qr(&DatosQr {
            fecha: venta.fecha,
            cuit_emisor,
            punto_venta: punto,
            tipo_cmp: ct,
            nro_cmp: numero,
            importe: calculada.calculo.ven_total,
            tipo_doc_receptor: payload.doc_tipo,
            nro_doc_receptor: payload.doc_nro,
            cae: cae.cae.clone(),
            cae_vencimiento: cae.vencimiento,
        });

        if let Err(err) = repo
            .registrar_cae(venta.id, &cae.cae, cae.vencimiento, &qr)
            .await
        {
            // The CAE exists at the authority even though we failed to
            // store it; surface everything needed to reattach it by hand.
            error!(
                venta_id = venta.id,
                cae = %cae.cae,
                vencimiento = %cae.vencimiento,
                error = %err,
                "CAE otorgado sin persistir; requiere conciliación manual"
            );
            return Err(AppError::Internal(format!(
                "CAE {} otorgado pero no persistido: {err}",
                cae.cae
            )));
        }
        Ok(qr)
    }

    /// `CbtesAsoc` projection for notas; empty for other types.
    async fn asociados(
        &self,
        repo: &VentaRepository,
        venta_id: i32,
        tipo: TipoComprobante,
    ) -> Result<Vec<CbteAsociado>, AppError> {
        if !tipo.es_nota() {
            return Ok(Vec::new());
        }
        let filas = repo.asociaciones(venta_id).await.map_err(AppError::from)?;
        let mut asociados = Vec::with_capacity(filas.len());
        for (factura, comp) in filas {
            let doc_tipo = if factura.cuit.as_deref().is_some_and(|c| !c.trim().is_empty()) {
                DOC_TIPO_CUIT
            } else if factura.dni.as_deref().is_some_and(|d| !d.trim().is_empty()) {
                DOC_TIPO_DNI
            } else {
                DOC_TIPO_CONSUMIDOR_FINAL
            };
            asociados.push(CbteAsociado {
                tipo: cbte_tipo(&comp.codigo_afip)
                    .map_err(|e| AppError::Validation(e.to_string()))?,
                pto_vta: u32::try_from(factura.ven_punto).unwrap_or(0),
                nro: u64::try_from(factura.ven_numero).unwrap_or(0),
                fecha: factura.fecha,
                doc_tipo,
                cuit: factura.cuit,
            });
        }
        Ok(asociados)
    }

    /// Cash completion: auto-imputation closing the document plus the
    /// register movements through the payment-method catalog.
    async fn completar_contado(
        &self,
        input: &EmisionInput,
        venta: &ventas::Model,
        calculo: &DocumentoCalculado,
    ) -> Result<(), AppError> {
        let sesion_caja = input.sesion_caja_id.ok_or_else(|| {
            AppError::Validation("una venta de contado requiere una sesión de caja abierta".into())
        })?;

        let pagado: Decimal = input.pagos.iter().map(|p| p.monto).sum();
        let imputado = pagado.min(calculo.ven_total);
        if imputado > Decimal::ZERO {
            ImputacionRepository::new(self.db.clone())
                .crear(CreateImputacionInput {
                    fecha: venta.fecha,
                    monto: imputado,
                    observacion: None,
                    origen: (KindCc::Venta, venta.id),
                    destino: (KindCc::Venta, venta.id),
                })
                .await
                .map_err(AppError::from)?;
        }

        let legs: Vec<PagoVentaInput> = input
            .pagos
            .iter()
            .map(|p| PagoVentaInput {
                metodo_pago_id: p.metodo_pago_id,
                monto: p.monto,
            })
            .collect();
        CajaRepository::new(self.db.clone())
            .registrar_pagos_venta(
                sesion_caja,
                venta.id,
                &format!("Cobro venta {}", venta.id),
                &legs,
            )
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    async fn restaurar_presupuesto(&self, presupuesto_id: i32) {
        use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
        let Ok(Some(fila)) = ventas::Entity::find_by_id(presupuesto_id).one(&self.db).await else {
            return;
        };
        let mut activo = fila.into_active_model();
        activo.convertida_a_fiscal = Set(false);
        activo.factura_fiscal_convertida = Set(None);
        activo.fecha_conversion = Set(None);
        activo.update(&self.db).await.ok();
    }

    async fn catalogo(&self, codigo_afip: &str) -> Result<comprobantes::Model, AppError> {
        comprobantes::Entity::find()
            .filter(comprobantes::Column::CodigoAfip.eq(codigo_afip))
            .one(&self.db)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
            .ok_or_else(|| {
                AppError::Validation(format!("comprobante desconocido: {codigo_afip}"))
            })
    }
}

fn digitos(texto: &str) -> Option<u64> {
    let d: String = texto.chars().filter(char::is_ascii_digit).collect();
    d.parse().ok()
}

/// Today's civil date, the default issue date for new documents.
#[must_use]
pub fn hoy() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
