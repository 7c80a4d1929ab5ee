//! `SeaORM` Entity for clientes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "clientes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub razon: String,
    pub fantasia: Option<String>,
    pub domicilio: Option<String>,
    pub localidad: Option<String>,
    #[sea_orm(unique)]
    pub cuit: Option<String>,
    pub dni: Option<String>,
    /// Customer's IVA condition catalog id; feeds `CondicionIVAReceptorId`.
    pub tipo_iva_id: Option<i32>,
    /// Assigned price list, 0..=4.
    pub lista_precio: i16,
    pub descu1: Decimal,
    pub descu2: Decimal,
    pub descu3: Decimal,
    pub vendedor: Option<String>,
    pub plazo: Option<String>,
    /// A active, I inactive.
    pub activo: String,
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
