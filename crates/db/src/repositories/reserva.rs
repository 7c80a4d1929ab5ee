//! Stock reservation repository: short-lived holds that keep concurrent
//! carts from overselling the same supplier stock.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use ferredesk_shared::error::AppError;

use crate::entities::{reservas_stock, stock_prove};

/// Error types for reservation operations.
#[derive(Debug, thiserror::Error)]
pub enum ReservaError {
    /// No stock row for the (product, supplier) pair.
    #[error("No existe stock del producto {stock_id} para el proveedor {proveedor_id}")]
    StockProveNoEncontrado { stock_id: i32, proveedor_id: i32 },

    /// Not enough free stock after discounting live holds.
    #[error("Stock insuficiente: disponible {disponible}, solicitado {solicitado}")]
    StockInsuficiente {
        disponible: Decimal,
        solicitado: Decimal,
    },

    /// Quantity must be positive.
    #[error("La cantidad a reservar debe ser positiva: {0}")]
    CantidadNoPositiva(Decimal),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<ReservaError> for AppError {
    fn from(err: ReservaError) -> Self {
        match err {
            ReservaError::StockInsuficiente { .. } => Self::Conflict(err.to_string()),
            ReservaError::Database(_) => Self::Database(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Input for creating a reservation.
#[derive(Debug, Clone)]
pub struct CreateReservaInput {
    pub stock_id: i32,
    pub proveedor_id: i32,
    pub cantidad: Decimal,
    pub usuario: String,
    pub sesion: Uuid,
    /// Hold lifetime; the sweeper expires overdue holds.
    pub ttl_minutos: i64,
}

/// Stock reservation repository.
#[derive(Debug, Clone)]
pub struct ReservaRepository {
    db: DatabaseConnection,
}

impl ReservaRepository {
    /// Creates a new reservation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Places a hold on supplier stock.
    ///
    /// The stock row is locked for the duration of the check so two
    /// concurrent holds cannot both pass the availability test. Available
    /// stock is the on-hand quantity minus every live (active, unexpired)
    /// hold on the same row.
    ///
    /// # Errors
    ///
    /// Returns [`ReservaError::StockInsuficiente`] when the free quantity
    /// is below the request, and database errors otherwise.
    pub async fn crear(
        &self,
        input: CreateReservaInput,
    ) -> Result<reservas_stock::Model, ReservaError> {
        if input.cantidad <= Decimal::ZERO {
            return Err(ReservaError::CantidadNoPositiva(input.cantidad));
        }

        let txn = self.db.begin().await?;
        let ahora = Utc::now();

        let fila = stock_prove::Entity::find()
            .filter(stock_prove::Column::StockId.eq(input.stock_id))
            .filter(stock_prove::Column::ProveedorId.eq(input.proveedor_id))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(ReservaError::StockProveNoEncontrado {
                stock_id: input.stock_id,
                proveedor_id: input.proveedor_id,
            })?;

        let reservado: Decimal = reservas_stock::Entity::find()
            .filter(reservas_stock::Column::StockId.eq(input.stock_id))
            .filter(reservas_stock::Column::ProveedorId.eq(input.proveedor_id))
            .filter(reservas_stock::Column::Estado.eq("activa"))
            .filter(reservas_stock::Column::ExpiraEn.gt(ahora))
            .all(&txn)
            .await?
            .iter()
            .map(|r| r.cantidad)
            .sum();

        let disponible = fila.cantidad - reservado;
        if disponible < input.cantidad {
            return Err(ReservaError::StockInsuficiente {
                disponible,
                solicitado: input.cantidad,
            });
        }

        let reserva = reservas_stock::ActiveModel {
            stock_id: Set(input.stock_id),
            proveedor_id: Set(input.proveedor_id),
            cantidad: Set(input.cantidad),
            usuario: Set(input.usuario),
            sesion: Set(input.sesion),
            creada_en: Set(ahora.into()),
            expira_en: Set((ahora + Duration::minutes(input.ttl_minutos)).into()),
            estado: Set("activa".to_string()),
            venta_id: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(reserva)
    }

    /// Confirms every live hold of a session against an issued venta,
    /// decrementing the on-hand quantities it was protecting.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn confirmar(&self, sesion: Uuid, venta_id: i32) -> Result<u64, ReservaError> {
        let txn = self.db.begin().await?;
        let ahora = Utc::now();

        let activas = reservas_stock::Entity::find()
            .filter(reservas_stock::Column::Sesion.eq(sesion))
            .filter(reservas_stock::Column::Estado.eq("activa"))
            .filter(reservas_stock::Column::ExpiraEn.gt(ahora))
            .lock_exclusive()
            .all(&txn)
            .await?;

        let confirmadas = activas.len() as u64;
        for reserva in activas {
            let fila = stock_prove::Entity::find()
                .filter(stock_prove::Column::StockId.eq(reserva.stock_id))
                .filter(stock_prove::Column::ProveedorId.eq(reserva.proveedor_id))
                .lock_exclusive()
                .one(&txn)
                .await?;
            if let Some(fila) = fila {
                let nueva_cantidad = fila.cantidad - reserva.cantidad;
                let mut activo: stock_prove::ActiveModel = fila.into();
                activo.cantidad = Set(nueva_cantidad);
                activo.update(&txn).await?;
            }

            let mut activo: reservas_stock::ActiveModel = reserva.into();
            activo.estado = Set("confirmada".to_string());
            activo.venta_id = Set(Some(venta_id));
            activo.update(&txn).await?;
        }

        txn.commit().await?;
        Ok(confirmadas)
    }

    /// Releases every live hold of a session.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn cancelar(&self, sesion: Uuid) -> Result<u64, ReservaError> {
        let resultado = reservas_stock::Entity::update_many()
            .col_expr(reservas_stock::Column::Estado, Expr::value("cancelada"))
            .filter(reservas_stock::Column::Sesion.eq(sesion))
            .filter(reservas_stock::Column::Estado.eq("activa"))
            .exec(&self.db)
            .await?;
        Ok(resultado.rows_affected)
    }

    /// Expires overdue holds. Called periodically by the background
    /// sweeper; returns the number of rows expired.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn barrer_expiradas(&self) -> Result<u64, ReservaError> {
        let resultado = reservas_stock::Entity::update_many()
            .col_expr(reservas_stock::Column::Estado, Expr::value("expirada"))
            .filter(reservas_stock::Column::Estado.eq("activa"))
            .filter(reservas_stock::Column::ExpiraEn.lt(Utc::now()))
            .exec(&self.db)
            .await?;
        Ok(resultado.rows_affected)
    }
}
