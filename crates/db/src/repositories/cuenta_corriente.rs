//! Cuenta corriente repository: projects the per-party documents and
//! imputation links into the pure stream engine.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter};

use ferredesk_core::calculo::{CalculoError, DescuentosCabecera, LineaBase, calcular_documento};
use ferredesk_core::cc::{self, DocumentoCc, ImputacionCc, KindCc, MovimientoCc, TipoCc, armar_stream};
use ferredesk_core::comprobante::{
    ComprobanteError, Letra, TipoComprobante, es_operacion_efectiva, numero_formateado,
};
use ferredesk_shared::error::AppError;

use crate::entities::{
    ajustes_proveedor, alicuotas_iva, compras, comprobantes, imputaciones, ordenes_pago, recibos,
    venta_detalle_items, ventas,
};

/// Error types for cuenta corriente operations.
#[derive(Debug, thiserror::Error)]
pub enum CuentaCorrienteError {
    /// Corrupt catalog reference in storage.
    #[error(transparent)]
    Catalogo(#[from] ComprobanteError),

    /// Calculation failure over stored lines.
    #[error(transparent)]
    Calculo(#[from] CalculoError),

    /// Stream construction failure.
    #[error(transparent)]
    Stream(#[from] cc::CuentaCorrienteError),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<CuentaCorrienteError> for AppError {
    fn from(err: CuentaCorrienteError) -> Self {
        match err {
            CuentaCorrienteError::Database(_) => Self::Database(err.to_string()),
            CuentaCorrienteError::Stream(_) => Self::Integrity(err.to_string()),
            _ => Self::Internal(err.to_string()),
        }
    }
}

/// Cuenta corriente repository.
#[derive(Debug, Clone)]
pub struct CuentaCorrienteRepository {
    db: DatabaseConnection,
}

impl CuentaCorrienteRepository {
    /// Creates a new cuenta corriente repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Movement stream for one customer. `completo = false` keeps only
    /// movements whose document still has an open balance.
    ///
    /// # Errors
    ///
    /// Returns an error when stored rows are inconsistent or the database
    /// fails.
    pub async fn cliente(
        &self,
        cliente_id: i32,
        completo: bool,
    ) -> Result<Vec<MovimientoCc>, CuentaCorrienteError> {
        let mut documentos = Vec::new();

        let cabeceras = ventas::Entity::find()
            .filter(ventas::Column::ClienteId.eq(cliente_id))
            .filter(ventas::Column::Estado.eq("AB"))
            .all(&self.db)
            .await?;
        documentos.extend(self.proyectar_ventas(&cabeceras).await?);

        let cobros = recibos::Entity::find()
            .filter(recibos::Column::ClienteId.eq(cliente_id))
            .filter(recibos::Column::Estado.eq("AB"))
            .all(&self.db)
            .await?;
        for recibo in cobros {
            documentos.push(DocumentoCc {
                kind: KindCc::Recibo,
                id: i64::from(recibo.id),
                fecha: recibo.fecha,
                hora: recibo.hora_creacion.naive_utc(),
                tipo: TipoCc::Recibo,
                total: Some(recibo.total),
                numero_formateado: numero_formateado(
                    Letra::I,
                    u32::try_from(recibo.punto).unwrap_or(0),
                    u64::try_from(recibo.numero).unwrap_or(0),
                ),
            });
        }

        let imputaciones = self.imputaciones_de(&documentos).await?;
        Ok(armar_stream(&documentos, &imputaciones, completo)?)
    }

    /// Movement stream for one supplier, mirroring the customer ledger:
    /// compras and ajustes débito land on the debit side, órdenes de pago
    /// and ajustes crédito on the credit side.
    ///
    /// # Errors
    ///
    /// Returns an error when stored rows are inconsistent or the database
    /// fails.
    pub async fn proveedor(
        &self,
        proveedor_id: i32,
        completo: bool,
    ) -> Result<Vec<MovimientoCc>, CuentaCorrienteError> {
        let mut documentos = Vec::new();

        let facturas = compras::Entity::find()
            .filter(compras::Column::ProveedorId.eq(proveedor_id))
            .filter(compras::Column::Estado.eq("CERRADA"))
            .all(&self.db)
            .await?;
        for compra in facturas {
            documentos.push(DocumentoCc {
                kind: KindCc::Compra,
                id: i64::from(compra.id),
                fecha: compra.fecha,
                hora: compra.hora_creacion.naive_utc(),
                tipo: TipoCc::Compra,
                total: Some(compra.comp_total),
                numero_formateado: compra.comp_numero_factura,
            });
        }

        let pagos = ordenes_pago::Entity::find()
            .filter(ordenes_pago::Column::ProveedorId.eq(proveedor_id))
            .filter(ordenes_pago::Column::Estado.eq("AB"))
            .all(&self.db)
            .await?;
        for orden in pagos {
            documentos.push(DocumentoCc {
                kind: KindCc::OrdenPago,
                id: i64::from(orden.id),
                fecha: orden.fecha,
                hora: orden.hora_creacion.naive_utc(),
                tipo: TipoCc::OrdenPago,
                total: Some(orden.total),
                numero_formateado: numero_formateado(
                    Letra::O,
                    u32::try_from(orden.punto).unwrap_or(0),
                    u64::try_from(orden.numero).unwrap_or(0),
                ),
            });
        }

        let ajustes = ajustes_proveedor::Entity::find()
            .filter(ajustes_proveedor::Column::ProveedorId.eq(proveedor_id))
            .filter(ajustes_proveedor::Column::Estado.eq("A"))
            .all(&self.db)
            .await?;
        for ajuste in ajustes {
            let tipo = if ajuste.tipo == "DEBITO" {
                TipoCc::AjusteDebito
            } else {
                TipoCc::AjusteCredito
            };
            documentos.push(DocumentoCc {
                kind: KindCc::AjusteProveedor,
                id: i64::from(ajuste.id),
                fecha: ajuste.fecha,
                hora: ajuste.hora_creacion.naive_utc(),
                tipo,
                total: Some(ajuste.monto),
                numero_formateado: format!("AJ {:08}", ajuste.numero),
            });
        }

        let imputaciones = self.imputaciones_de(&documentos).await?;
        Ok(armar_stream(&documentos, &imputaciones, completo)?)
    }

    /// Projects venta headers into engine documents, deriving each total
    /// from its stored lines and filtering out presupuestos and converted
    /// quotes.
    async fn proyectar_ventas(
        &self,
        cabeceras: &[ventas::Model],
    ) -> Result<Vec<DocumentoCc>, CuentaCorrienteError> {
        let catalogo: HashMap<i32, comprobantes::Model> = comprobantes::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let rates = alicuotas_iva::Entity::find().all(&self.db).await?;
        let porcentaje = |id: i32| -> Decimal {
            rates
                .iter()
                .find(|r| r.id == id)
                .map_or(Decimal::ZERO, |r| r.porce)
        };

        let ids: Vec<i32> = cabeceras.iter().map(|v| v.id).collect();
        let mut items_por_venta: HashMap<i32, Vec<venta_detalle_items::Model>> = HashMap::new();
        if !ids.is_empty() {
            for item in venta_detalle_items::Entity::find()
                .filter(venta_detalle_items::Column::VdiIdve.is_in(ids))
                .all(&self.db)
                .await?
            {
                items_por_venta.entry(item.vdi_idve).or_default().push(item);
            }
        }

        let mut documentos = Vec::with_capacity(cabeceras.len());
        for venta in cabeceras {
            let Some(comprobante) = catalogo.get(&venta.comprobante_id) else {
                continue;
            };
            let tipo = TipoComprobante::from_str(&comprobante.tipo)?;
            if !es_operacion_efectiva(tipo, venta.convertida_a_fiscal) {
                continue;
            }
            let Some(tipo_cc) = tipo_movimiento(tipo) else {
                continue;
            };
            let letra = Letra::from_str(&comprobante.letra)?;

            let lineas: Vec<LineaBase> = items_por_venta
                .get(&venta.id)
                .map(Vec::as_slice)
                .unwrap_or_default()
                .iter()
                .map(|i| LineaBase {
                    orden: u32::try_from(i.vdi_orden).unwrap_or(0),
                    cantidad: i.vdi_cantidad,
                    costo: i.vdi_costo,
                    margen: i.vdi_margen,
                    bonifica: i.vdi_bonifica,
                    ali_porce: porcentaje(i.vdi_idaliiva),
                    precio_unitario_final: i.vdi_precio_unitario_final,
                })
                .collect();
            let calculo = calcular_documento(
                &lineas,
                DescuentosCabecera {
                    descu1: venta.ven_descu1,
                    descu2: venta.ven_descu2,
                    descu3: venta.ven_descu3,
                },
                venta.ven_descuento_cierre,
            )?;

            documentos.push(DocumentoCc {
                kind: KindCc::Venta,
                id: i64::from(venta.id),
                fecha: venta.fecha,
                hora: venta.hora_creacion.naive_utc(),
                tipo: tipo_cc,
                total: Some(calculo.ven_total),
                numero_formateado: numero_formateado(
                    letra,
                    u32::try_from(venta.ven_punto).unwrap_or(0),
                    u64::try_from(venta.ven_numero).unwrap_or(0),
                ),
            });
        }
        Ok(documentos)
    }

    /// Loads the imputation links touching any of the given documents.
    async fn imputaciones_de(
        &self,
        documentos: &[DocumentoCc],
    ) -> Result<Vec<ImputacionCc>, CuentaCorrienteError> {
        let mut por_kind: HashMap<&'static str, Vec<i32>> = HashMap::new();
        for doc in documentos {
            if let Ok(id) = i32::try_from(doc.id) {
                por_kind.entry(doc.kind.tag()).or_default().push(id);
            }
        }
        if por_kind.is_empty() {
            return Ok(Vec::new());
        }

        let mut condicion = Condition::any();
        for (kind, ids) in &por_kind {
            condicion = condicion
                .add(
                    Condition::all()
                        .add(imputaciones::Column::DestinoKind.eq(*kind))
                        .add(imputaciones::Column::DestinoId.is_in(ids.clone())),
                )
                .add(
                    Condition::all()
                        .add(imputaciones::Column::OrigenKind.eq(*kind))
                        .add(imputaciones::Column::OrigenId.is_in(ids.clone())),
                );
        }

        let filas = imputaciones::Entity::find()
            .filter(condicion)
            .all(&self.db)
            .await?;

        let mut enlaces = Vec::with_capacity(filas.len());
        for fila in filas {
            let (Some(origen), Some(destino)) =
                (kind_desde_tag(&fila.origen_kind), kind_desde_tag(&fila.destino_kind))
            else {
                continue;
            };
            enlaces.push(ImputacionCc {
                id: i64::from(fila.id),
                origen: (origen, i64::from(fila.origen_id)),
                destino: (destino, i64::from(fila.destino_id)),
                monto: fila.imp_monto,
            });
        }
        Ok(enlaces)
    }
}

/// Maps a catalog type to the ledger movement type. Presupuestos and
/// órdenes de compra never enter the cuenta corriente.
const fn tipo_movimiento(tipo: TipoComprobante) -> Option<TipoCc> {
    match tipo {
        TipoComprobante::Factura => Some(TipoCc::Factura),
        TipoComprobante::FacturaInterna => Some(TipoCc::Cotizacion),
        TipoComprobante::NotaDebito | TipoComprobante::NotaDebitoInterna => {
            Some(TipoCc::NotaDebito)
        }
        TipoComprobante::NotaCredito | TipoComprobante::NotaCreditoInterna => {
            Some(TipoCc::NotaCredito)
        }
        TipoComprobante::Recibo => Some(TipoCc::Recibo),
        TipoComprobante::Presupuesto | TipoComprobante::OrdenCompra => None,
    }
}

fn kind_desde_tag(tag: &str) -> Option<KindCc> {
    match tag {
        "venta" => Some(KindCc::Venta),
        "recibo" => Some(KindCc::Recibo),
        "compra" => Some(KindCc::Compra),
        "orden_pago" => Some(KindCc::OrdenPago),
        "ajuste_proveedor" => Some(KindCc::AjusteProveedor),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presupuestos_never_enter_the_ledger() {
        assert!(tipo_movimiento(TipoComprobante::Presupuesto).is_none());
        assert!(tipo_movimiento(TipoComprobante::OrdenCompra).is_none());
        assert_eq!(
            tipo_movimiento(TipoComprobante::FacturaInterna),
            Some(TipoCc::Cotizacion)
        );
    }

    #[test]
    fn test_kind_tags_round_trip() {
        for kind in [
            KindCc::Venta,
            KindCc::Recibo,
            KindCc::Compra,
            KindCc::OrdenPago,
            KindCc::AjusteProveedor,
        ] {
            assert_eq!(kind_desde_tag(kind.tag()), Some(kind));
        }
    }
}
