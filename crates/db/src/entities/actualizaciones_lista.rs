//! `SeaORM` Entity for the append-only price-list recalculation audit.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "actualizaciones_lista")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub lista_numero: i16,
    pub margen_anterior: Decimal,
    pub margen_nuevo: Decimal,
    pub productos_recalculados: i32,
    pub productos_manuales_omitidos: i32,
    pub usuario: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
