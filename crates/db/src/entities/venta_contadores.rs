//! `SeaORM` Entity for local numbering counters of internal documents.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "venta_contadores")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub comprobante_tipo: String,
    pub letra: String,
    pub punto: i32,
    pub ultimo: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
