//! `SeaORM` Entity for audited cash movements.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "movimientos_caja")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sesion_id: i32,
    /// INGRESO or EGRESO.
    pub tipo: String,
    pub concepto: String,
    pub monto: Decimal,
    pub metodo_pago_id: Option<i32>,
    pub venta_id: Option<i32>,
    pub orden_pago_id: Option<i32>,
    pub creado_en: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sesiones_caja::Entity",
        from = "Column::SesionId",
        to = "super::sesiones_caja::Column::Id"
    )]
    SesionesCaja,
}

impl Related<super::sesiones_caja::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SesionesCaja.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
