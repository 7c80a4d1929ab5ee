//! `SeaORM` Entity for mutually-exclusive document edit locks.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "form_locks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// venta, presupuesto or conversion.
    pub tipo: String,
    pub usuario: String,
    pub sesion: Uuid,
    /// The quote being edited or converted; at most one live lock per
    /// (tipo, presupuesto_id).
    pub presupuesto_id: Option<i32>,
    pub adquirido_en: DateTimeWithTimeZone,
    pub expira_en: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
