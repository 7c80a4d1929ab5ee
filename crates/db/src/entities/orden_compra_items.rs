//! `SeaORM` Entity for internal purchase order lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "orden_compra_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub oci_idoc: i32,
    pub oci_orden: i32,
    pub oci_idsto: Option<i32>,
    pub oci_cantidad: Decimal,
    pub oci_detalle1: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ordenes_compra::Entity",
        from = "Column::OciIdoc",
        to = "super::ordenes_compra::Column::Id"
    )]
    OrdenesCompra,
}

impl Related<super::ordenes_compra::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenesCompra.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
