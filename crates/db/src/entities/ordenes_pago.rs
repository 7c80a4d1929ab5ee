//! `SeaORM` Entity for supplier payment orders.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ordenes_pago")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub proveedor_id: i32,
    pub fecha: Date,
    pub hora_creacion: DateTimeWithTimeZone,
    pub punto: i32,
    pub numero: i64,
    pub total: Decimal,
    /// Cash imputations write egreso movements into this session.
    pub sesion_caja_id: Option<i32>,
    pub observacion: Option<String>,
    /// AB issued, AN voided.
    pub estado: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::proveedores::Entity",
        from = "Column::ProveedorId",
        to = "super::proveedores::Column::Id"
    )]
    Proveedores,
}

impl ActiveModelBehavior for ActiveModel {}
