//! `SeaORM` Entity for customer payment receipts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "recibos")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cliente_id: i32,
    pub fecha: Date,
    pub hora_creacion: DateTimeWithTimeZone,
    pub punto: i32,
    pub numero: i64,
    pub total: Decimal,
    pub observacion: Option<String>,
    /// AB issued, AN voided.
    pub estado: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clientes::Entity",
        from = "Column::ClienteId",
        to = "super::clientes::Column::Id"
    )]
    Clientes,
}

impl ActiveModelBehavior for ActiveModel {}
