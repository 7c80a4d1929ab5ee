//! `SeaORM` Entity for purchase document lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "compra_detalle_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cdi_idco: i32,
    pub cdi_orden: i32,
    pub cdi_idsto: Option<i32>,
    pub cdi_cantidad: Decimal,
    pub cdi_costo: Decimal,
    pub cdi_detalle1: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::compras::Entity",
        from = "Column::CdiIdco",
        to = "super::compras::Column::Id"
    )]
    Compras,
}

impl Related<super::compras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
