//! `SeaORM` Entity for per-product price-list exceptions.
//!
//! Rows exist only for manual overrides; derived prices are computed at
//! read time and never persisted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "precios_producto_lista")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub stock_id: i32,
    pub lista_numero: i16,
    pub precio: Decimal,
    pub precio_manual: bool,
    /// Audit: who set the manual price.
    pub usuario: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
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

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
