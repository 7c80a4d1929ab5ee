//! `SeaORM` Entity for the five price lists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "listas_precio")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 0..=4; list 0 is the base.
    #[sea_orm(unique)]
    pub numero: i16,
    pub nombre: String,
    /// Signed percentage over list 0 (negative = discount).
    pub margen_descuento: Decimal,
    pub activa: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
