//! Price list repository.
//!
//! Lists 1..=4 derive from list 0 by a signed percentage; derived prices
//! are computed at read time and never persisted, so a list-wide recalc is
//! a single margin update plus an audit row. Only manual overrides live in
//! `precios_producto_lista`.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};

use ferredesk_core::precios::{
    PrecioResuelto, PreciosError, precio_lista_0, resolver_precio, validar_lista_recalculable,
};
use ferredesk_shared::error::AppError;

use crate::entities::{actualizaciones_lista, listas_precio, precios_producto_lista, stock,
    stock_prove};

/// Error types for price list operations.
#[derive(Debug, thiserror::Error)]
pub enum ListaPrecioError {
    /// List number outside 1..=4 for recalc, or unknown.
    #[error(transparent)]
    Precios(#[from] PreciosError),

    /// The list does not exist in the catalog.
    #[error("Lista de precios no encontrada: {0}")]
    ListaNoEncontrada(u8),

    /// Product not found.
    #[error("Producto no encontrado: {0}")]
    ProductoNoEncontrado(i32),

    /// The product has no cost from its habitual supplier yet.
    #[error("El producto {0} no tiene costo del proveedor habitual")]
    SinCostoHabitual(i32),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<ListaPrecioError> for AppError {
    fn from(err: ListaPrecioError) -> Self {
        match err {
            ListaPrecioError::ListaNoEncontrada(_) | ListaPrecioError::ProductoNoEncontrado(_) => {
                Self::NotFound(err.to_string())
            }
            ListaPrecioError::Database(_) => Self::Database(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Outcome of a list-wide recalc.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct ResumenRecalculo {
    /// Products whose derived price moved with the new margin.
    pub recalculados: u64,
    /// Products untouched because a manual override pins their price.
    pub manuales_omitidos: u64,
}

/// Price list repository.
#[derive(Debug, Clone)]
pub struct ListaPrecioRepository {
    db: DatabaseConnection,
}

impl ListaPrecioRepository {
    /// Creates a new price list repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a new margin to a derived list (1..=4) and records the
    /// change. Manual overrides keep their prices and are only counted.
    ///
    /// # Errors
    ///
    /// Returns an error for list 0, unknown lists, or database failures.
    pub async fn recalcular(
        &self,
        numero: u8,
        nuevo_margen: Decimal,
        usuario: Option<&str>,
    ) -> Result<ResumenRecalculo, ListaPrecioError> {
        validar_lista_recalculable(numero)?;

        let txn = self.db.begin().await?;

        let lista = listas_precio::Entity::find()
            .filter(listas_precio::Column::Numero.eq(i16::from(numero)))
            .one(&txn)
            .await?
            .ok_or(ListaPrecioError::ListaNoEncontrada(numero))?;
        let margen_anterior = lista.margen_descuento;

        let activos = stock::Entity::find()
            .filter(stock::Column::Acti.eq("A"))
            .count(&txn)
            .await?;
        let manuales = precios_producto_lista::Entity::find()
            .filter(precios_producto_lista::Column::ListaNumero.eq(i16::from(numero)))
            .filter(precios_producto_lista::Column::PrecioManual.eq(true))
            .count(&txn)
            .await?;
        let recalculados = activos.saturating_sub(manuales);

        let mut activo: listas_precio::ActiveModel = lista.into();
        activo.margen_descuento = Set(nuevo_margen);
        activo.update(&txn).await?;

        actualizaciones_lista::ActiveModel {
            lista_numero: Set(i16::from(numero)),
            margen_anterior: Set(margen_anterior),
            margen_nuevo: Set(nuevo_margen),
            productos_recalculados: Set(i32::try_from(recalculados).unwrap_or(i32::MAX)),
            productos_manuales_omitidos: Set(i32::try_from(manuales).unwrap_or(i32::MAX)),
            usuario: Set(usuario.map(str::to_string)),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(ResumenRecalculo {
            recalculados,
            manuales_omitidos: manuales,
        })
    }

    /// Refreshes a product's stored list-0 price from its habitual
    /// supplier's cost. Products with a manual list-0 price are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when the product or its habitual cost is missing,
    /// or the database fails.
    pub async fn actualizar_precio_base(
        &self,
        stock_id: i32,
    ) -> Result<Option<Decimal>, ListaPrecioError> {
        let producto = self.producto(stock_id).await?;
        if producto.precio_lista_0_manual {
            return Ok(None);
        }

        let costo = self
            .costo_habitual(&producto)
            .await?
            .ok_or(ListaPrecioError::SinCostoHabitual(stock_id))?;
        let precio = precio_lista_0(costo, producto.margen);

        let mut activo: stock::ActiveModel = producto.into();
        activo.precio_lista_0 = Set(Some(precio));
        activo.update(&self.db).await?;
        Ok(Some(precio))
    }

    /// Effective price of a product on a list: manual override when one
    /// exists, derived from list 0 otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error when the product or list is missing, or the
    /// database fails.
    pub async fn precio_vigente(
        &self,
        stock_id: i32,
        lista_numero: u8,
    ) -> Result<PrecioResuelto, ListaPrecioError> {
        let producto = self.producto(stock_id).await?;

        let base = match producto.precio_lista_0 {
            Some(precio) if producto.precio_lista_0_manual => precio,
            _ => {
                let costo = self
                    .costo_habitual(&producto)
                    .await?
                    .ok_or(ListaPrecioError::SinCostoHabitual(stock_id))?;
                precio_lista_0(costo, producto.margen)
            }
        };

        if lista_numero == 0 {
            return Ok(resolver_precio(base, Decimal::ZERO, None));
        }

        let lista = listas_precio::Entity::find()
            .filter(listas_precio::Column::Numero.eq(i16::from(lista_numero)))
            .one(&self.db)
            .await?
            .ok_or(ListaPrecioError::ListaNoEncontrada(lista_numero))?;

        let manual = precios_producto_lista::Entity::find()
            .filter(precios_producto_lista::Column::StockId.eq(stock_id))
            .filter(precios_producto_lista::Column::ListaNumero.eq(i16::from(lista_numero)))
            .filter(precios_producto_lista::Column::PrecioManual.eq(true))
            .one(&self.db)
            .await?
            .map(|fila| fila.precio);

        Ok(resolver_precio(base, lista.margen_descuento, manual))
    }

    /// Pins a manual price for a product on one list, replacing a previous
    /// override when present.
    ///
    /// # Errors
    ///
    /// Returns an error when the product is missing or the database fails.
    pub async fn fijar_precio_manual(
        &self,
        stock_id: i32,
        lista_numero: u8,
        precio: Decimal,
        usuario: Option<&str>,
    ) -> Result<precios_producto_lista::Model, ListaPrecioError> {
        // Validates existence before pinning.
        self.producto(stock_id).await?;

        let existente = precios_producto_lista::Entity::find()
            .filter(precios_producto_lista::Column::StockId.eq(stock_id))
            .filter(precios_producto_lista::Column::ListaNumero.eq(i16::from(lista_numero)))
            .one(&self.db)
            .await?;

        let ahora = Utc::now();
        let modelo = match existente {
            Some(fila) => {
                let mut activo: precios_producto_lista::ActiveModel = fila.into();
                activo.precio = Set(precio);
                activo.precio_manual = Set(true);
                activo.usuario = Set(usuario.map(str::to_string));
                activo.updated_at = Set(ahora.into());
                activo.update(&self.db).await?
            }
            None => {
                precios_producto_lista::ActiveModel {
                    stock_id: Set(stock_id),
                    lista_numero: Set(i16::from(lista_numero)),
                    precio: Set(precio),
                    precio_manual: Set(true),
                    usuario: Set(usuario.map(str::to_string)),
                    updated_at: Set(ahora.into()),
                    ..Default::default()
                }
                .insert(&self.db)
                .await?
            }
        };
        Ok(modelo)
    }

    /// Removes a manual override; the product falls back to the derived
    /// price on its next read.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn quitar_precio_manual(
        &self,
        stock_id: i32,
        lista_numero: u8,
    ) -> Result<u64, ListaPrecioError> {
        let resultado = precios_producto_lista::Entity::delete_many()
            .filter(precios_producto_lista::Column::StockId.eq(stock_id))
            .filter(precios_producto_lista::Column::ListaNumero.eq(i16::from(lista_numero)))
            .exec(&self.db)
            .await?;
        Ok(resultado.rows_affected)
    }

    async fn producto(&self, stock_id: i32) -> Result<stock::Model, ListaPrecioError> {
        stock::Entity::find_by_id(stock_id)
            .one(&self.db)
            .await?
            .ok_or(ListaPrecioError::ProductoNoEncontrado(stock_id))
    }

    async fn costo_habitual(
        &self,
        producto: &stock::Model,
    ) -> Result<Option<Decimal>, ListaPrecioError> {
        Ok(stock_prove::Entity::find()
            .filter(stock_prove::Column::StockId.eq(producto.id))
            .filter(stock_prove::Column::ProveedorId.eq(producto.proveedor_habitual_id))
            .one(&self.db)
            .await?
            .map(|fila| fila.costo))
    }
}
