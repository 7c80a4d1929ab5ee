//! Imputation repository: links credit documents to the debit documents
//! they pay, with overcommit guards on both sides.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DatabaseConnection,
    DbErr, EntityTrait, QueryFilter, QuerySelect, Set, TransactionTrait,
};

use ferredesk_core::calculo::{CalculoError, DescuentosCabecera, LineaBase, calcular_documento};
use ferredesk_core::cc::{KindCc, Lado};
use ferredesk_core::comprobante::{ComprobanteError, TipoComprobante};
use ferredesk_shared::error::AppError;

use crate::entities::{
    ajustes_proveedor, alicuotas_iva, compras, comprobantes, imputaciones, ordenes_pago, recibos,
    venta_detalle_items, ventas,
};

/// Error types for imputation operations.
#[derive(Debug, thiserror::Error)]
pub enum ImputacionError {
    /// Amount must be positive.
    #[error("El monto a imputar debe ser positivo: {0}")]
    MontoNoPositivo(Decimal),

    /// Referenced document missing.
    #[error("Documento {kind} {id} no encontrado")]
    DocumentoNoEncontrado { kind: &'static str, id: i32 },

    /// The origin must be a credit document.
    #[error("El origen debe ser un documento de crédito")]
    OrigenNoEsCredito,

    /// The destination must be a debit document.
    #[error("El destino debe ser un documento de débito")]
    DestinoNoEsDebito,

    /// Both documents must belong to the same party.
    #[error("Origen y destino pertenecen a distintas partes")]
    PartesDistintas,

    /// The amount would push a document past its total.
    #[error("La imputación excede el saldo: imputado {imputado}, total {total}")]
    ExcedeSaldo { imputado: Decimal, total: Decimal },

    /// Corrupt catalog reference in storage.
    #[error(transparent)]
    Catalogo(#[from] ComprobanteError),

    /// Calculation failure over stored lines.
    #[error(transparent)]
    Calculo(#[from] CalculoError),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<ImputacionError> for AppError {
    fn from(err: ImputacionError) -> Self {
        match err {
            ImputacionError::DocumentoNoEncontrado { .. } => Self::NotFound(err.to_string()),
            ImputacionError::ExcedeSaldo { .. } => Self::Integrity(err.to_string()),
            ImputacionError::Database(_) => Self::Database(err.to_string()),
            ImputacionError::Catalogo(_) | ImputacionError::Calculo(_) => {
                Self::Internal(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Input for creating an imputation link.
#[derive(Debug, Clone)]
pub struct CreateImputacionInput {
    pub fecha: NaiveDate,
    pub monto: Decimal,
    pub observacion: Option<String>,
    pub origen: (KindCc, i32),
    pub destino: (KindCc, i32),
}

/// The party a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parte {
    Cliente(i32),
    Proveedor(i32),
}

struct InfoDocumento {
    lado: Lado,
    parte: Parte,
    total: Decimal,
}

/// Imputation repository.
#[derive(Debug, Clone)]
pub struct ImputacionRepository {
    db: DatabaseConnection,
}

impl ImputacionRepository {
    /// Creates a new imputation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Links a credit document to a debit document for `monto`.
    ///
    /// Both rows are locked while the open balances are checked, so two
    /// concurrent imputations cannot jointly overcommit a document. A
    /// $0.01 tolerance absorbs rounding residue on the last peso.
    ///
    /// # Errors
    ///
    /// Returns an error when the sides are on the wrong ledger side,
    /// belong to different parties, or the amount exceeds either side's
    /// open balance.
    pub async fn crear(
        &self,
        input: CreateImputacionInput,
    ) -> Result<imputaciones::Model, ImputacionError> {
        if input.monto <= Decimal::ZERO {
            return Err(ImputacionError::MontoNoPositivo(input.monto));
        }

        let txn = self.db.begin().await?;

        let origen = info_documento(&txn, input.origen.0, input.origen.1).await?;
        let destino = info_documento(&txn, input.destino.0, input.destino.1).await?;

        // The cash-sale auto-imputation links a document to itself; the
        // document then plays both sides.
        let auto = input.origen == input.destino;
        if !auto && origen.lado != Lado::Haber {
            return Err(ImputacionError::OrigenNoEsCredito);
        }
        if destino.lado != Lado::Debe {
            return Err(ImputacionError::DestinoNoEsDebito);
        }
        if origen.parte != destino.parte {
            return Err(ImputacionError::PartesDistintas);
        }

        let imputado_destino = suma_imputada(&txn, input.destino, true).await?;
        if imputado_destino + input.monto > destino.total + tolerancia() {
            return Err(ImputacionError::ExcedeSaldo {
                imputado: imputado_destino + input.monto,
                total: destino.total,
            });
        }
        if !auto {
            let imputado_origen = suma_imputada(&txn, input.origen, false).await?;
            if imputado_origen + input.monto > origen.total + tolerancia() {
                return Err(ImputacionError::ExcedeSaldo {
                    imputado: imputado_origen + input.monto,
                    total: origen.total,
                });
            }
        }

        let fila = imputaciones::ActiveModel {
            imp_fecha: Set(input.fecha),
            imp_monto: Set(input.monto),
            imp_observacion: Set(input.observacion),
            origen_kind: Set(input.origen.0.tag().to_string()),
            origen_id: Set(input.origen.1),
            destino_kind: Set(input.destino.0.tag().to_string()),
            destino_id: Set(input.destino.1),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(fila)
    }

    /// Removes an imputation link, reopening both sides by its amount.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn eliminar(&self, imputacion_id: i32) -> Result<u64, ImputacionError> {
        let resultado = imputaciones::Entity::delete_by_id(imputacion_id)
            .exec(&self.db)
            .await?;
        Ok(resultado.rows_affected)
    }
}

fn tolerancia() -> Decimal {
    Decimal::new(1, 2)
}

/// Sum already imputed against one side of a document.
async fn suma_imputada(
    txn: &DatabaseTransaction,
    lado: (KindCc, i32),
    como_destino: bool,
) -> Result<Decimal, ImputacionError> {
    let filtro = if como_destino {
        imputaciones::Entity::find()
            .filter(imputaciones::Column::DestinoKind.eq(lado.0.tag()))
            .filter(imputaciones::Column::DestinoId.eq(lado.1))
    } else {
        imputaciones::Entity::find()
            .filter(imputaciones::Column::OrigenKind.eq(lado.0.tag()))
            .filter(imputaciones::Column::OrigenId.eq(lado.1))
    };
    Ok(filtro.all(txn).await?.iter().map(|i| i.imp_monto).sum())
}

/// Loads and locks one document, resolving its ledger side, party and
/// total.
async fn info_documento(
    txn: &DatabaseTransaction,
    kind: KindCc,
    id: i32,
) -> Result<InfoDocumento, ImputacionError> {
    let faltante = || ImputacionError::DocumentoNoEncontrado {
        kind: kind.tag(),
        id,
    };
    match kind {
        KindCc::Venta => {
            let venta = ventas::Entity::find_by_id(id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or_else(faltante)?;
            let comprobante = comprobantes::Entity::find_by_id(venta.comprobante_id)
                .one(txn)
                .await?
                .ok_or_else(faltante)?;
            let tipo = TipoComprobante::from_str(&comprobante.tipo)?;
            let lado = if matches!(
                tipo,
                TipoComprobante::NotaCredito | TipoComprobante::NotaCreditoInterna
            ) {
                Lado::Haber
            } else {
                Lado::Debe
            };
            let cliente = venta.cliente_id.ok_or_else(faltante)?;
            let total = total_venta(txn, &venta).await?;
            Ok(InfoDocumento {
                lado,
                parte: Parte::Cliente(cliente),
                total,
            })
        }
        KindCc::Recibo => {
            let recibo = recibos::Entity::find_by_id(id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or_else(faltante)?;
            Ok(InfoDocumento {
                lado: Lado::Haber,
                parte: Parte::Cliente(recibo.cliente_id),
                total: recibo.total,
            })
        }
        KindCc::Compra => {
            let compra = compras::Entity::find_by_id(id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or_else(faltante)?;
            Ok(InfoDocumento {
                lado: Lado::Debe,
                parte: Parte::Proveedor(compra.proveedor_id),
                total: compra.comp_total,
            })
        }
        KindCc::OrdenPago => {
            let orden = ordenes_pago::Entity::find_by_id(id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or_else(faltante)?;
            Ok(InfoDocumento {
                lado: Lado::Haber,
                parte: Parte::Proveedor(orden.proveedor_id),
                total: orden.total,
            })
        }
        KindCc::AjusteProveedor => {
            let ajuste = ajustes_proveedor::Entity::find_by_id(id)
                .lock_exclusive()
                .one(txn)
                .await?
                .ok_or_else(faltante)?;
            let lado = if ajuste.tipo == "DEBITO" {
                Lado::Debe
            } else {
                Lado::Haber
            };
            Ok(InfoDocumento {
                lado,
                parte: Parte::Proveedor(ajuste.proveedor_id),
                total: ajuste.monto,
            })
        }
    }
}

/// Document total of a venta, derived from its stored lines.
async fn total_venta<C: ConnectionTrait>(
    conn: &C,
    venta: &ventas::Model,
) -> Result<Decimal, ImputacionError> {
    let items = venta_detalle_items::Entity::find()
        .filter(venta_detalle_items::Column::VdiIdve.eq(venta.id))
        .all(conn)
        .await?;
    let rates = alicuotas_iva::Entity::find().all(conn).await?;
    let porcentaje = |id: i32| -> Decimal {
        rates
            .iter()
            .find(|r| r.id == id)
            .map_or(Decimal::ZERO, |r| r.porce)
    };

    let lineas: Vec<LineaBase> = items
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
    Ok(calculo.ven_total)
}
