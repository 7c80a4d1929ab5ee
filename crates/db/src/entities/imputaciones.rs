//! `SeaORM` Entity for the unified imputation table.
//!
//! Both sides are polymorphic (kind tag + row id): the origin is always a
//! credit document, the destination always a debit one.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "imputaciones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub imp_fecha: Date,
    pub imp_monto: Decimal,
    pub imp_observacion: Option<String>,
    /// venta, recibo, compra, orden_pago or ajuste_proveedor.
    pub origen_kind: String,
    pub origen_id: i32,
    pub destino_kind: String,
    pub destino_id: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
