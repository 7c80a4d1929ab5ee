//! `SeaORM` Entity for purchase document headers.
//!
//! Totals are user-supplied from the paper invoice; `comp_verificacion`
//! is the computed cross-check (neto + ΣIVA).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "compras")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub proveedor_id: i32,
    pub fecha: Date,
    pub hora_creacion: DateTimeWithTimeZone,
    pub comp_numero_factura: String,
    /// BORRADOR, CERRADA or ANULADA.
    pub estado: String,
    pub comp_neto: Decimal,
    pub comp_iva_21: Decimal,
    pub comp_iva_105: Decimal,
    pub comp_iva_27: Decimal,
    pub comp_total: Decimal,
    pub comp_verificacion: Decimal,
    pub observacion: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::compra_detalle_items::Entity")]
    CompraDetalleItems,
    #[sea_orm(
        belongs_to = "super::proveedores::Entity",
        from = "Column::ProveedorId",
        to = "super::proveedores::Column::Id"
    )]
    Proveedores,
}

impl Related<super::compra_detalle_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompraDetalleItems.def()
    }
}

impl Related<super::proveedores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proveedores.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
