//! `SeaORM` Entity linking notas de crédito/débito to their facturas.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "comprobante_asociaciones")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub factura_afectada: i32,
    /// Exactly one of these two is populated.
    pub nota_credito: Option<i32>,
    pub nota_debito: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ventas::Entity",
        from = "Column::FacturaAfectada",
        to = "super::ventas::Column::Id"
    )]
    FacturaAfectada,
}

impl ActiveModelBehavior for ActiveModel {}
