//! `SeaORM` Entity linking sales to their payments.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "pagos_venta")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub venta_id: i32,
    pub metodo_pago_id: i32,
    pub monto: Decimal,
    pub creado_en: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ventas::Entity",
        from = "Column::VentaId",
        to = "super::ventas::Column::Id"
    )]
    Ventas,
    #[sea_orm(
        belongs_to = "super::metodos_pago::Entity",
        from = "Column::MetodoPagoId",
        to = "super::metodos_pago::Column::Id"
    )]
    MetodosPago,
}

impl ActiveModelBehavior for ActiveModel {}
