//! `SeaORM` Entity for the comprobante type catalog.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "comprobantes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// AFIP code as stored by the catalog, e.g. "001", "006", "9997".
    #[sea_orm(unique)]
    pub codigo_afip: String,
    pub nombre: String,
    /// A, B, C, E, I, P, O.
    pub letra: String,
    /// Canonical type name, e.g. "factura", "nota_credito_interna".
    pub tipo: String,
    pub activo: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ventas::Entity")]
    Ventas,
}

impl Related<super::ventas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ventas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
