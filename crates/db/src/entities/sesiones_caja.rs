//! `SeaORM` Entity for cash register sessions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sesiones_caja")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub usuario: String,
    pub abierta_en: DateTimeWithTimeZone,
    pub cerrada_en: Option<DateTimeWithTimeZone>,
    pub saldo_inicial: Decimal,
    pub saldo_cierre: Option<Decimal>,
    /// ABIERTA or CERRADA.
    pub estado: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::movimientos_caja::Entity")]
    MovimientosCaja,
}

impl Related<super::movimientos_caja::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovimientosCaja.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
