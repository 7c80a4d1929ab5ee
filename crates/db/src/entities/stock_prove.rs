//! `SeaORM` Entity for the product-supplier relation (cost and on-hand).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_prove")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub stock_id: i32,
    pub proveedor_id: i32,
    pub costo: Decimal,
    /// On-hand quantity; may go negative only transiently.
    pub cantidad: Decimal,
    pub codigo_producto_proveedor: Option<String>,
    pub fecha_ultima_compra: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock::Entity",
        from = "Column::StockId",
        to = "super::stock::Column::Id"
    )]
    Stock,
    #[sea_orm(
        belongs_to = "super::proveedores::Entity",
        from = "Column::ProveedorId",
        to = "super::proveedores::Column::Id"
    )]
    Proveedores,
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl Related<super::proveedores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proveedores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
