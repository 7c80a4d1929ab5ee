//! `SeaORM` Entity for short-lived stock reservations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reservas_stock")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub stock_id: i32,
    pub proveedor_id: i32,
    pub cantidad: Decimal,
    pub usuario: String,
    /// Browser/session handle the hold belongs to.
    pub sesion: Uuid,
    pub creada_en: DateTimeWithTimeZone,
    pub expira_en: DateTimeWithTimeZone,
    /// activa, confirmada, cancelada or expirada.
    pub estado: String,
    /// Set on confirmation.
    pub venta_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock::Entity",
        from = "Column::StockId",
        to = "super::stock::Column::Id"
    )]
    Stock,
}

impl ActiveModelBehavior for ActiveModel {}
