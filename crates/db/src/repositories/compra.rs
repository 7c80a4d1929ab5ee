//! Compra repository: purchase documents with user-supplied totals and
//! the stock updates applied when a draft closes.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, RuntimeErr, Set, TransactionTrait,
};

use ferredesk_shared::error::AppError;

use crate::entities::{compra_detalle_items, compras, orden_compra_items, ordenes_compra,
    stock_prove};
use crate::repositories::venta::proximo_numero;

/// Error types for compra operations.
#[derive(Debug, thiserror::Error)]
pub enum CompraError {
    /// Compra not found.
    #[error("Compra no encontrada: {0}")]
    NotFound(i32),

    /// Orden de compra not found.
    #[error("Orden de compra no encontrada: {0}")]
    OrdenNoEncontrada(i32),

    /// The supplier already has a compra with this invoice number.
    #[error("El proveedor {proveedor_id} ya tiene la factura {numero}")]
    FacturaDuplicada { proveedor_id: i32, numero: String },

    /// Transition not allowed from the current state.
    #[error("Transición inválida desde el estado {0}")]
    EstadoInvalido(String),

    /// Quantities must be positive.
    #[error("La cantidad del renglón {0} debe ser positiva")]
    CantidadNoPositiva(i32),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<CompraError> for AppError {
    fn from(err: CompraError) -> Self {
        match err {
            CompraError::NotFound(_) | CompraError::OrdenNoEncontrada(_) => {
                Self::NotFound(err.to_string())
            }
            CompraError::FacturaDuplicada { .. } => Self::Integrity(err.to_string()),
            CompraError::EstadoInvalido(_) => Self::State(err.to_string()),
            CompraError::CantidadNoPositiva(_) => Self::Validation(err.to_string()),
            CompraError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Input for a single purchase line.
#[derive(Debug, Clone)]
pub struct CreateCompraItemInput {
    pub orden: i32,
    pub idsto: Option<i32>,
    pub cantidad: Decimal,
    pub costo: Decimal,
    pub detalle1: String,
}

/// Input for creating a purchase draft.
#[derive(Debug, Clone)]
pub struct CreateCompraInput {
    pub proveedor_id: i32,
    pub fecha: NaiveDate,
    pub numero_factura: String,
    pub neto: Decimal,
    pub iva_21: Decimal,
    pub iva_105: Decimal,
    pub iva_27: Decimal,
    pub total: Decimal,
    pub observacion: Option<String>,
    pub items: Vec<CreateCompraItemInput>,
}

/// Input for creating an internal purchase order.
#[derive(Debug, Clone)]
pub struct CreateOrdenCompraInput {
    pub proveedor_id: i32,
    pub fecha: NaiveDate,
    pub punto: i32,
    pub observacion: Option<String>,
    pub items: Vec<CreateCompraItemInput>,
}

/// Compra repository for purchase persistence and stock application.
#[derive(Debug, Clone)]
pub struct CompraRepository {
    db: DatabaseConnection,
}

impl CompraRepository {
    /// Creates a new compra repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a purchase in BORRADOR with its lines. The verification
    /// total (neto + ΣIVA) is computed here so a mismatch against the
    /// user-typed total stays visible to the operator.
    ///
    /// # Errors
    ///
    /// Returns [`CompraError::FacturaDuplicada`] when the supplier already
    /// has that invoice number, and database errors otherwise.
    pub async fn crear(&self, input: CreateCompraInput) -> Result<compras::Model, CompraError> {
        for item in &input.items {
            if item.cantidad <= Decimal::ZERO {
                return Err(CompraError::CantidadNoPositiva(item.orden));
            }
        }

        let verificacion = input.neto + input.iva_21 + input.iva_105 + input.iva_27;

        let txn = self.db.begin().await?;
        let ahora = Utc::now();

        let compra = compras::ActiveModel {
            proveedor_id: Set(input.proveedor_id),
            fecha: Set(input.fecha),
            hora_creacion: Set(ahora.into()),
            comp_numero_factura: Set(input.numero_factura.clone()),
            estado: Set("BORRADOR".to_string()),
            comp_neto: Set(input.neto),
            comp_iva_21: Set(input.iva_21),
            comp_iva_105: Set(input.iva_105),
            comp_iva_27: Set(input.iva_27),
            comp_total: Set(input.total),
            comp_verificacion: Set(verificacion),
            observacion: Set(input.observacion.clone()),
            created_at: Set(ahora.into()),
            updated_at: Set(ahora.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|err| clasificar_unicidad(err, input.proveedor_id, &input.numero_factura))?;

        for item in &input.items {
            compra_detalle_items::ActiveModel {
                cdi_idco: Set(compra.id),
                cdi_orden: Set(item.orden),
                cdi_idsto: Set(item.idsto),
                cdi_cantidad: Set(item.cantidad),
                cdi_costo: Set(item.costo),
                cdi_detalle1: Set(item.detalle1.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(compra)
    }

    /// Closes a draft (BORRADOR -> CERRADA), applying the stock deltas:
    /// each stocked line adds its quantity to the (product, supplier) row,
    /// refreshing the owned cost and last purchase date. Lines without a
    /// product reference leave stock untouched.
    ///
    /// # Errors
    ///
    /// Returns an error when the compra is not a draft or the database
    /// fails.
    pub async fn cerrar(&self, compra_id: i32) -> Result<compras::Model, CompraError> {
        let txn = self.db.begin().await?;

        let compra = compras::Entity::find_by_id(compra_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CompraError::NotFound(compra_id))?;
        if compra.estado != "BORRADOR" {
            return Err(CompraError::EstadoInvalido(compra.estado));
        }

        let items = compra_detalle_items::Entity::find()
            .filter(compra_detalle_items::Column::CdiIdco.eq(compra_id))
            .all(&txn)
            .await?;
        for item in &items {
            let Some(stock_id) = item.cdi_idsto else {
                continue;
            };
            aplicar_delta(
                &txn,
                stock_id,
                compra.proveedor_id,
                item.cdi_cantidad,
                Some(item.cdi_costo),
                Some(compra.fecha),
            )
            .await?;
        }

        let mut activo: compras::ActiveModel = compra.into();
        activo.estado = Set("CERRADA".to_string());
        activo.updated_at = Set(Utc::now().into());
        let cerrada = activo.update(&txn).await?;

        txn.commit().await?;
        Ok(cerrada)
    }

    /// Voids a compra. Voiding a CERRADA reverses its stock deltas; a
    /// BORRADOR never touched stock, so only the state flips.
    ///
    /// # Errors
    ///
    /// Returns an error when the compra is already voided or the database
    /// fails.
    pub async fn anular(&self, compra_id: i32) -> Result<compras::Model, CompraError> {
        let txn = self.db.begin().await?;

        let compra = compras::Entity::find_by_id(compra_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CompraError::NotFound(compra_id))?;
        if compra.estado == "ANULADA" {
            return Err(CompraError::EstadoInvalido(compra.estado));
        }

        if compra.estado == "CERRADA" {
            let items = compra_detalle_items::Entity::find()
                .filter(compra_detalle_items::Column::CdiIdco.eq(compra_id))
                .all(&txn)
                .await?;
            for item in &items {
                let Some(stock_id) = item.cdi_idsto else {
                    continue;
                };
                aplicar_delta(&txn, stock_id, compra.proveedor_id, -item.cdi_cantidad, None, None)
                    .await?;
            }
        }

        let mut activo: compras::ActiveModel = compra.into();
        activo.estado = Set("ANULADA".to_string());
        activo.updated_at = Set(Utc::now().into());
        let anulada = activo.update(&txn).await?;

        txn.commit().await?;
        Ok(anulada)
    }

    /// Creates an internal purchase order (ABIERTO), numbered
    /// "O 0001-00000001" from the local counter.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn crear_orden(
        &self,
        input: CreateOrdenCompraInput,
    ) -> Result<ordenes_compra::Model, CompraError> {
        let txn = self.db.begin().await?;

        let numero = proximo_numero(&txn, "orden_compra", "O", input.punto).await?;
        let orden = ordenes_compra::ActiveModel {
            proveedor_id: Set(input.proveedor_id),
            fecha: Set(input.fecha),
            punto: Set(input.punto),
            numero: Set(numero),
            estado: Set("ABIERTO".to_string()),
            observacion: Set(input.observacion.clone()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for item in &input.items {
            orden_compra_items::ActiveModel {
                oci_idoc: Set(orden.id),
                oci_orden: Set(item.orden),
                oci_idsto: Set(item.idsto),
                oci_cantidad: Set(item.cantidad),
                oci_detalle1: Set(item.detalle1.clone()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(orden)
    }

    /// Closes an open purchase order (ABIERTO -> CERRADO). Orders never
    /// move stock; the compra raised from them does.
    ///
    /// # Errors
    ///
    /// Returns an error when the order is already closed or the database
    /// fails.
    pub async fn cerrar_orden(&self, orden_id: i32) -> Result<ordenes_compra::Model, CompraError> {
        let orden = ordenes_compra::Entity::find_by_id(orden_id)
            .one(&self.db)
            .await?
            .ok_or(CompraError::OrdenNoEncontrada(orden_id))?;
        if orden.estado != "ABIERTO" {
            return Err(CompraError::EstadoInvalido(orden.estado));
        }

        let mut activo: ordenes_compra::ActiveModel = orden.into();
        activo.estado = Set("CERRADO".to_string());
        Ok(activo.update(&self.db).await?)
    }
}

/// Adds `delta` to the on-hand quantity of a (product, supplier) row,
/// creating the row when this is the supplier's first purchase of the
/// product. Cost and last purchase date are refreshed only on close, not
/// on reversal.
async fn aplicar_delta(
    txn: &DatabaseTransaction,
    stock_id: i32,
    proveedor_id: i32,
    delta: Decimal,
    costo: Option<Decimal>,
    fecha_compra: Option<NaiveDate>,
) -> Result<(), CompraError> {
    let fila = stock_prove::Entity::find()
        .filter(stock_prove::Column::StockId.eq(stock_id))
        .filter(stock_prove::Column::ProveedorId.eq(proveedor_id))
        .lock_exclusive()
        .one(txn)
        .await?;

    match fila {
        Some(fila) => {
            let cantidad = fila.cantidad + delta;
            let mut activo: stock_prove::ActiveModel = fila.into();
            activo.cantidad = Set(cantidad);
            if let Some(costo) = costo {
                activo.costo = Set(costo);
            }
            if let Some(fecha) = fecha_compra {
                activo.fecha_ultima_compra = Set(Some(fecha));
            }
            activo.update(txn).await?;
        }
        None => {
            stock_prove::ActiveModel {
                stock_id: Set(stock_id),
                proveedor_id: Set(proveedor_id),
                costo: Set(costo.unwrap_or(Decimal::ZERO)),
                cantidad: Set(delta),
                codigo_producto_proveedor: Set(None),
                fecha_ultima_compra: Set(fecha_compra),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
    }
    Ok(())
}

/// Maps the (numero_factura, proveedor) unique violation to its domain
/// error; everything else passes through.
fn clasificar_unicidad(err: DbErr, proveedor_id: i32, numero: &str) -> CompraError {
    let es_unicidad = matches!(
        &err,
        DbErr::Query(RuntimeErr::SqlxError(_)) | DbErr::Exec(RuntimeErr::SqlxError(_))
    ) && err.to_string().contains("compras_comp_numero_factura");
    if es_unicidad {
        CompraError::FacturaDuplicada {
            proveedor_id,
            numero: numero.to_string(),
        }
    } else {
        CompraError::Database(err)
    }
}
