//! `SeaORM` Entity for internal purchase orders.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ordenes_compra")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub proveedor_id: i32,
    pub fecha: Date,
    pub punto: i32,
    pub numero: i64,
    /// ABIERTO or CERRADO.
    pub estado: String,
    pub observacion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::orden_compra_items::Entity")]
    OrdenCompraItems,
}

impl Related<super::orden_compra_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrdenCompraItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
