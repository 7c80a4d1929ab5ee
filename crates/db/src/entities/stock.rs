//! `SeaORM` Entity for the stock (product) table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stock")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Display code used at the counter.
    #[sea_orm(unique)]
    pub codvta: String,
    pub deno: String,
    pub unidad: String,
    /// Cost margin, percentage.
    pub margen: Decimal,
    pub idaliiva: i32,
    /// Habitual supplier; every active product has exactly one.
    pub proveedor_habitual_id: i32,
    /// A active, I inactive.
    pub acti: String,
    /// Stored list-0 price; meaningful when the manual flag is set,
    /// otherwise derived from the habitual supplier's cost.
    pub precio_lista_0: Option<Decimal>,
    pub precio_lista_0_manual: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_prove::Entity")]
    StockProve,
    #[sea_orm(
        belongs_to = "super::proveedores::Entity",
        from = "Column::ProveedorHabitualId",
        to = "super::proveedores::Column::Id"
    )]
    ProveedorHabitual,
}

impl Related<super::stock_prove::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockProve.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
