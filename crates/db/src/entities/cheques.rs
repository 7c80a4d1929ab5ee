//! `SeaORM` Entity for cheques and their endorsement chain.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cheques")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub numero: String,
    pub banco: String,
    pub importe: Decimal,
    pub fecha_emision: Date,
    pub fecha_cobro: Option<Date>,
    /// EN_CARTERA, ENDOSADO, DEPOSITADO, RECHAZADO or COBRADO.
    pub estado: String,
    /// proveedor, cliente or a named third party.
    pub endosado_a: Option<String>,
    pub proveedor_id: Option<i32>,
    pub cliente_id: Option<i32>,
    /// Debit note raised when the cheque bounced.
    pub nota_debito_id: Option<i32>,
    pub creado_en: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
