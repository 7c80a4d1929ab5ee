//! `SeaORM` Entity for supplier debit/credit adjustments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ajustes_proveedor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub proveedor_id: i32,
    /// DEBITO or CREDITO.
    pub tipo: String,
    /// A active, I inactive.
    pub estado: String,
    pub monto: Decimal,
    pub numero: i64,
    pub fecha: Date,
    pub hora_creacion: DateTimeWithTimeZone,
    pub observacion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
