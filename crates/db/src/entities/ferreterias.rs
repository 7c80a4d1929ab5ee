//! `SeaORM` Entity for the ferreterias singleton configuration table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ferreterias")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cuit: String,
    pub razon_social: String,
    pub situacion_iva: String,
    pub punto_venta_defecto: i32,
    pub arca_habilitado: bool,
    /// `HOM` or `PROD`.
    pub modo_arca: String,
    pub certificado_path: Option<String>,
    pub clave_privada_path: Option<String>,
    pub alicuota_iva_defecto_id: i32,
    pub comprobante_defecto_id: i32,
    pub ultima_validacion: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
