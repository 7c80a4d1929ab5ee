//! `SeaORM` Entity for the alicuotas_iva catalog.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "alicuotas_iva")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub codigo: String,
    pub deno: String,
    /// Percentage, e.g. 21.00.
    pub porce: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::venta_detalle_items::Entity")]
    VentaDetalleItems,
}

impl Related<super::venta_detalle_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VentaDetalleItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
