//! `SeaORM` Entity for proveedores.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "proveedores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub razon: String,
    pub fantasia: Option<String>,
    pub domicilio: Option<String>,
    pub cuit: Option<String>,
    pub sigla: Option<String>,
    /// A active, I inactive.
    pub activo: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_prove::Entity")]
    StockProve,
    #[sea_orm(has_many = "super::compras::Entity")]
    Compras,
}

impl Related<super::stock_prove::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockProve.def()
    }
}

impl Related<super::compras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
