//! Venta repository: creation, numbering, state transitions and the
//! calculated projection of sales documents.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbBackend, DbErr, EntityTrait, QueryFilter, Set, Statement, TransactionTrait,
};

use ferredesk_core::arca::PayloadArca;
use ferredesk_core::calculo::{CalculoError, DocumentoCalculado, calcular_documento};
use ferredesk_core::comprobante::{
    ComprobanteError, EstadoError, EstadoVenta, Letra, TipoComprobante, numero_formateado,
    puede_anular, puede_convertir,
};
use ferredesk_shared::error::AppError;

use crate::entities::{alicuotas_iva, clientes, comprobante_asociaciones, comprobantes,
    venta_detalle_items, ventas};
use crate::repositories::totales;

/// Error types for venta operations.
#[derive(Debug, thiserror::Error)]
pub enum VentaError {
    /// Venta not found.
    #[error("Venta no encontrada: {0}")]
    NotFound(i32),

    /// Unknown comprobante code.
    #[error("Comprobante desconocido: {0}")]
    ComprobanteDesconocido(String),

    /// Customer not found.
    #[error("Cliente no encontrado: {0}")]
    ClienteNoEncontrado(i32),

    /// A nota requires at least one associated factura.
    #[error("Una nota requiere al menos una factura asociada")]
    NotaSinAsociacion,

    /// Fiscal documents need a number proposed from the authority.
    #[error("Documento fiscal sin número propuesto")]
    NumeroFiscalRequerido,

    /// The document already carries a CAE; re-emission is forbidden.
    #[error("La venta {0} ya tiene CAE asignado")]
    CaeYaAsignado(i32),

    /// Invalid state transition.
    #[error(transparent)]
    Estado(#[from] EstadoError),

    /// Catalog parsing failure.
    #[error(transparent)]
    Catalogo(#[from] ComprobanteError),

    /// Calculation failure over stored lines.
    #[error(transparent)]
    Calculo(#[from] CalculoError),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<VentaError> for AppError {
    fn from(err: VentaError) -> Self {
        match err {
            VentaError::NotFound(_) => Self::NotFound(err.to_string()),
            VentaError::Estado(_) | VentaError::CaeYaAsignado(_) => Self::State(err.to_string()),
            VentaError::Database(_) => Self::Database(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Input for a single sales line.
#[derive(Debug, Clone)]
pub struct CreateVentaItemInput {
    pub orden: i32,
    pub idsto: Option<i32>,
    pub idpro: Option<i32>,
    pub cantidad: Decimal,
    pub costo: Decimal,
    pub margen: Decimal,
    pub bonifica: Decimal,
    pub detalle1: String,
    pub detalle2: Option<String>,
    pub idaliiva: i32,
    pub precio_unitario_final: Option<Decimal>,
}

/// Input for creating a sales document.
#[derive(Debug, Clone)]
pub struct CreateVentaInput {
    pub comprobante_codigo_afip: String,
    pub punto: i32,
    pub fecha: NaiveDate,
    pub cliente_id: Option<i32>,
    pub descu1: Decimal,
    pub descu2: Decimal,
    pub descu3: Decimal,
    pub descuento_cierre: Decimal,
    pub bonificacion_general: Decimal,
    pub observacion: Option<String>,
    pub vencimiento: Option<NaiveDate>,
    /// Facturas affected, required when the comprobante is a nota.
    pub facturas_asociadas: Vec<i32>,
    pub items: Vec<CreateVentaItemInput>,
}

/// A venta with its lines and the engine's derived quantities.
#[derive(Debug, Clone)]
pub struct VentaCalculada {
    pub venta: ventas::Model,
    pub items: Vec<venta_detalle_items::Model>,
    pub calculo: DocumentoCalculado,
    pub letra: Letra,
    pub tipo: TipoComprobante,
    pub numero_formateado: String,
}

/// CAE granted by the authority.
#[derive(Debug, Clone)]
pub struct CaeOtorgado {
    pub cae: String,
    pub vencimiento: NaiveDate,
}

/// Seam between the persistence flow and the SOAP client; implemented by
/// the real WSFEv1 adapter in production and by stubs in tests.
#[async_trait::async_trait]
pub trait AutoridadFiscal: Send + Sync {
    /// Last authorized number for (point of sale, AFIP document type).
    async fn ultimo_autorizado(&self, punto: u32, cbte_tipo: u32) -> Result<u64, AppError>;

    /// Requests a CAE for one document.
    async fn solicitar_cae(
        &self,
        punto: u32,
        cbte_tipo: u32,
        payload: &PayloadArca,
    ) -> Result<CaeOtorgado, AppError>;
}

/// Venta repository for sales document persistence.
#[derive(Debug, Clone)]
pub struct VentaRepository {
    db: DatabaseConnection,
}

impl VentaRepository {
    /// Creates a new venta repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a sales document with its lines in one transaction.
    ///
    /// Internal documents draw their number from the local per-(tipo,
    /// letra, punto) counter; fiscal ones must arrive with the number the
    /// orchestrator proposed from "último autorizado + 1".
    ///
    /// # Errors
    ///
    /// Returns an error when the comprobante is unknown, a nota arrives
    /// without associations, a fiscal document arrives without a proposed
    /// number, or the database fails.
    pub async fn crear(
        &self,
        input: CreateVentaInput,
        numero_fiscal: Option<i64>,
    ) -> Result<ventas::Model, VentaError> {
        let comprobante = self.comprobante(&input.comprobante_codigo_afip).await?;
        let tipo = TipoComprobante::from_str(&comprobante.tipo)?;
        let letra = Letra::from_str(&comprobante.letra)?;

        if tipo.es_nota() && input.facturas_asociadas.is_empty() {
            return Err(VentaError::NotaSinAsociacion);
        }

        let snapshot = match input.cliente_id {
            Some(id) => Some(
                clientes::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or(VentaError::ClienteNoEncontrado(id))?,
            ),
            None => None,
        };

        let txn = self.db.begin().await?;

        let numero = if tipo.es_fiscal() && letra.es_fiscal() {
            numero_fiscal.ok_or(VentaError::NumeroFiscalRequerido)?
        } else {
            proximo_numero(&txn, &comprobante.tipo, &comprobante.letra, input.punto).await?
        };

        let venta = self
            .insertar_cabecera(&txn, &input, &comprobante, snapshot.as_ref(), numero)
            .await?;
        self.insertar_items(&txn, venta.id, &input.items).await?;
        self.insertar_asociaciones(&txn, &venta, tipo, &input.facturas_asociadas)
            .await?;

        txn.commit().await?;
        Ok(venta)
    }

    /// Attaches the CAE, its expiration and the QR payload to an issued
    /// venta. Rejected when the venta already carries a CAE.
    ///
    /// # Errors
    ///
    /// Returns an error when the venta does not exist, already has a CAE,
    /// or the database fails.
    pub async fn registrar_cae(
        &self,
        venta_id: i32,
        cae: &str,
        vencimiento: NaiveDate,
        qr_payload: &str,
    ) -> Result<ventas::Model, VentaError> {
        let venta = self.buscar(venta_id).await?;
        if venta.cae.is_some() {
            return Err(VentaError::CaeYaAsignado(venta_id));
        }

        let mut activo: ventas::ActiveModel = venta.into();
        activo.cae = Set(Some(cae.to_string()));
        activo.cae_vencimiento = Set(Some(vencimiento));
        activo.qr_payload = Set(Some(qr_payload.to_string()));
        activo.updated_at = Set(Utc::now().into());
        Ok(activo.update(&self.db).await?)
    }

    /// Voids a sales document (AB -> AN). The row is kept; its number is
    /// freed for reuse by the partial unique index.
    ///
    /// # Errors
    ///
    /// Returns an error when the venta does not exist, is already voided,
    /// or the database fails.
    pub async fn anular(&self, venta_id: i32) -> Result<ventas::Model, VentaError> {
        let venta = self.buscar(venta_id).await?;
        let estado = EstadoVenta::from_str(&venta.estado)?;
        puede_anular(estado)?;

        let mut activo: ventas::ActiveModel = venta.into();
        activo.estado = Set(EstadoVenta::Anulado.as_str().to_string());
        activo.updated_at = Set(Utc::now().into());
        Ok(activo.update(&self.db).await?)
    }

    /// Converts a presupuesto into a brand-new fiscal (or internal)
    /// document carrying the same customer and lines, and marks the quote
    /// converted. The quote remains addressable but is filtered out of
    /// reports.
    ///
    /// # Errors
    ///
    /// Returns an error when the quote cannot be converted (wrong type,
    /// voided, already converted) or the database fails.
    pub async fn convertir(
        &self,
        presupuesto_id: i32,
        codigo_afip_destino: &str,
        numero_fiscal: Option<i64>,
    ) -> Result<ventas::Model, VentaError> {
        let presupuesto = self.buscar(presupuesto_id).await?;
        let comp_origen = comprobantes::Entity::find_by_id(presupuesto.comprobante_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| VentaError::ComprobanteDesconocido(String::new()))?;
        let tipo_origen = TipoComprobante::from_str(&comp_origen.tipo)?;
        let estado = EstadoVenta::from_str(&presupuesto.estado)?;
        puede_convertir(tipo_origen, estado, presupuesto.convertida_a_fiscal)?;

        let destino = self.comprobante(codigo_afip_destino).await?;
        let tipo_destino = TipoComprobante::from_str(&destino.tipo)?;
        let letra_destino = Letra::from_str(&destino.letra)?;

        let items = venta_detalle_items::Entity::find()
            .filter(venta_detalle_items::Column::VdiIdve.eq(presupuesto_id))
            .all(&self.db)
            .await?;

        let txn = self.db.begin().await?;

        let numero = if tipo_destino.es_fiscal() && letra_destino.es_fiscal() {
            numero_fiscal.ok_or(VentaError::NumeroFiscalRequerido)?
        } else {
            proximo_numero(&txn, &destino.tipo, &destino.letra, presupuesto.ven_punto).await?
        };

        let ahora = Utc::now();
        let nueva = ventas::ActiveModel {
            sucursal: Set(presupuesto.sucursal),
            fecha: Set(ahora.date_naive()),
            hora_creacion: Set(ahora.into()),
            comprobante_id: Set(destino.id),
            ven_punto: Set(presupuesto.ven_punto),
            ven_numero: Set(numero),
            cliente_id: Set(presupuesto.cliente_id),
            cuit: Set(presupuesto.cuit.clone()),
            dni: Set(presupuesto.dni.clone()),
            razon_social: Set(presupuesto.razon_social.clone()),
            domicilio: Set(presupuesto.domicilio.clone()),
            tipo_iva_id: Set(presupuesto.tipo_iva_id),
            ven_descu1: Set(presupuesto.ven_descu1),
            ven_descu2: Set(presupuesto.ven_descu2),
            ven_descu3: Set(presupuesto.ven_descu3),
            ven_descuento_cierre: Set(presupuesto.ven_descuento_cierre),
            bonificacion_general: Set(presupuesto.bonificacion_general),
            observacion: Set(presupuesto.observacion.clone()),
            estado: Set(EstadoVenta::Abierto.as_str().to_string()),
            created_at: Set(ahora.into()),
            updated_at: Set(ahora.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for item in &items {
            venta_detalle_items::ActiveModel {
                vdi_idve: Set(nueva.id),
                vdi_orden: Set(item.vdi_orden),
                vdi_idsto: Set(item.vdi_idsto),
                vdi_idpro: Set(item.vdi_idpro),
                vdi_cantidad: Set(item.vdi_cantidad),
                vdi_costo: Set(item.vdi_costo),
                vdi_margen: Set(item.vdi_margen),
                vdi_bonifica: Set(item.vdi_bonifica),
                vdi_detalle1: Set(item.vdi_detalle1.clone()),
                vdi_detalle2: Set(item.vdi_detalle2.clone()),
                vdi_idaliiva: Set(item.vdi_idaliiva),
                vdi_precio_unitario_final: Set(item.vdi_precio_unitario_final),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        let mut quote: ventas::ActiveModel = presupuesto.into();
        quote.convertida_a_fiscal = Set(true);
        quote.factura_fiscal_convertida = Set(Some(nueva.id));
        quote.fecha_conversion = Set(Some(ahora.into()));
        quote.updated_at = Set(ahora.into());
        quote.update(&txn).await?;

        txn.commit().await?;
        Ok(nueva)
    }

    /// Loads a venta with its lines and runs the calculation engine over
    /// them, returning the derived per-line and per-document quantities.
    ///
    /// # Errors
    ///
    /// Returns an error when the venta does not exist or a stored rate
    /// reference is broken.
    pub async fn calculada(&self, venta_id: i32) -> Result<VentaCalculada, VentaError> {
        let venta = self.buscar(venta_id).await?;
        let comprobante = comprobantes::Entity::find_by_id(venta.comprobante_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| VentaError::ComprobanteDesconocido(String::new()))?;
        let tipo = TipoComprobante::from_str(&comprobante.tipo)?;
        let letra = Letra::from_str(&comprobante.letra)?;

        let items = venta_detalle_items::Entity::find()
            .filter(venta_detalle_items::Column::VdiIdve.eq(venta_id))
            .all(&self.db)
            .await?;
        let rates = alicuotas_iva::Entity::find().all(&self.db).await?;
        let lineas = totales::proyectar_lineas(&items, &rates);

        let calculo = calcular_documento(
            &lineas,
            totales::descuentos(&venta),
            venta.ven_descuento_cierre,
        )?;

        let formateado = numero_formateado(
            letra,
            u32::try_from(venta.ven_punto).unwrap_or(0),
            u64::try_from(venta.ven_numero).unwrap_or(0),
        );

        Ok(VentaCalculada {
            venta,
            items,
            calculo,
            letra,
            tipo,
            numero_formateado: formateado,
        })
    }

    /// The associated facturas of a nota, with their AFIP data for the
    /// `CbtesAsoc` payload array.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn asociaciones(
        &self,
        nota_id: i32,
    ) -> Result<Vec<(ventas::Model, comprobantes::Model)>, VentaError> {
        let filas = comprobante_asociaciones::Entity::find()
            .filter(
                sea_orm::Condition::any()
                    .add(comprobante_asociaciones::Column::NotaCredito.eq(nota_id))
                    .add(comprobante_asociaciones::Column::NotaDebito.eq(nota_id)),
            )
            .all(&self.db)
            .await?;

        let mut resultado = Vec::with_capacity(filas.len());
        for fila in filas {
            let factura = self.buscar(fila.factura_afectada).await?;
            let comp = comprobantes::Entity::find_by_id(factura.comprobante_id)
                .one(&self.db)
                .await?
                .ok_or_else(|| VentaError::ComprobanteDesconocido(String::new()))?;
            resultado.push((factura, comp));
        }
        Ok(resultado)
    }

    /// Deletes a venta and its lines. Compensation path only: used by the
    /// orchestrator when a post-persistence step fails before commit of
    /// the business operation.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn eliminar(&self, venta_id: i32) -> Result<(), VentaError> {
        ventas::Entity::delete_by_id(venta_id).exec(&self.db).await?;
        Ok(())
    }

    async fn buscar(&self, venta_id: i32) -> Result<ventas::Model, VentaError> {
        ventas::Entity::find_by_id(venta_id)
            .one(&self.db)
            .await?
            .ok_or(VentaError::NotFound(venta_id))
    }

    async fn comprobante(&self, codigo_afip: &str) -> Result<comprobantes::Model, VentaError> {
        comprobantes::Entity::find()
            .filter(comprobantes::Column::CodigoAfip.eq(codigo_afip))
            .one(&self.db)
            .await?
            .ok_or_else(|| VentaError::ComprobanteDesconocido(codigo_afip.to_string()))
    }

    async fn insertar_cabecera(
        &self,
        txn: &DatabaseTransaction,
        input: &CreateVentaInput,
        comprobante: &comprobantes::Model,
        cliente: Option<&clientes::Model>,
        numero: i64,
    ) -> Result<ventas::Model, VentaError> {
        let ahora = Utc::now();
        let venta = ventas::ActiveModel {
            sucursal: Set(1),
            fecha: Set(input.fecha),
            hora_creacion: Set(ahora.into()),
            comprobante_id: Set(comprobante.id),
            ven_punto: Set(input.punto),
            ven_numero: Set(numero),
            cliente_id: Set(input.cliente_id),
            cuit: Set(cliente.and_then(|c| c.cuit.clone())),
            dni: Set(cliente.and_then(|c| c.dni.clone())),
            razon_social: Set(cliente.map(|c| c.razon.clone())),
            domicilio: Set(cliente.and_then(|c| c.domicilio.clone())),
            tipo_iva_id: Set(cliente.and_then(|c| c.tipo_iva_id)),
            ven_descu1: Set(input.descu1),
            ven_descu2: Set(input.descu2),
            ven_descu3: Set(input.descu3),
            ven_descuento_cierre: Set(input.descuento_cierre),
            bonificacion_general: Set(input.bonificacion_general),
            observacion: Set(input.observacion.clone()),
            estado: Set(EstadoVenta::Abierto.as_str().to_string()),
            vencimiento: Set(input.vencimiento),
            created_at: Set(ahora.into()),
            updated_at: Set(ahora.into()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        Ok(venta)
    }

    async fn insertar_items(
        &self,
        txn: &DatabaseTransaction,
        venta_id: i32,
        items: &[CreateVentaItemInput],
    ) -> Result<(), VentaError> {
        for item in items {
            venta_detalle_items::ActiveModel {
                vdi_idve: Set(venta_id),
                vdi_orden: Set(item.orden),
                vdi_idsto: Set(item.idsto),
                vdi_idpro: Set(item.idpro),
                vdi_cantidad: Set(item.cantidad),
                vdi_costo: Set(item.costo),
                vdi_margen: Set(item.margen),
                vdi_bonifica: Set(item.bonifica),
                vdi_detalle1: Set(item.detalle1.clone()),
                vdi_detalle2: Set(item.detalle2.clone()),
                vdi_idaliiva: Set(item.idaliiva),
                vdi_precio_unitario_final: Set(item.precio_unitario_final),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
        Ok(())
    }

    async fn insertar_asociaciones(
        &self,
        txn: &DatabaseTransaction,
        venta: &ventas::Model,
        tipo: TipoComprobante,
        facturas: &[i32],
    ) -> Result<(), VentaError> {
        if !tipo.es_nota() {
            return Ok(());
        }
        let es_credito = matches!(
            tipo,
            TipoComprobante::NotaCredito | TipoComprobante::NotaCreditoInterna
        );
        for factura_id in facturas {
            comprobante_asociaciones::ActiveModel {
                factura_afectada: Set(*factura_id),
                nota_credito: Set(es_credito.then_some(venta.id)),
                nota_debito: Set((!es_credito).then_some(venta.id)),
                ..Default::default()
            }
            .insert(txn)
            .await?;
        }
        Ok(())
    }
}

/// Bumps and returns the local counter for an internal document type.
///
/// The upsert is a single atomic statement, so concurrent issuers each get
/// a distinct, strictly increasing number.
pub(crate) async fn proximo_numero(
    txn: &DatabaseTransaction,
    tipo: &str,
    letra: &str,
    punto: i32,
) -> Result<i64, DbErr> {
    let stmt = Statement::from_sql_and_values(
        DbBackend::Postgres,
        "INSERT INTO venta_contadores (comprobante_tipo, letra, punto, ultimo)
         VALUES ($1, $2, $3, 1)
         ON CONFLICT (comprobante_tipo, letra, punto)
         DO UPDATE SET ultimo = venta_contadores.ultimo + 1
         RETURNING ultimo",
        [tipo.into(), letra.into(), punto.into()],
    );
    let fila = txn
        .query_one(stmt)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("venta_contadores".into()))?;
    fila.try_get("", "ultimo")
}
