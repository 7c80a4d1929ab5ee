//! `SeaORM` Entity for sales document lines.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "venta_detalle_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub vdi_idve: i32,
    /// Ordinal, unique within the document.
    pub vdi_orden: i32,
    /// Nullable for generic (non-stocked) items.
    pub vdi_idsto: Option<i32>,
    pub vdi_idpro: Option<i32>,
    pub vdi_cantidad: Decimal,
    pub vdi_costo: Decimal,
    pub vdi_margen: Decimal,
    pub vdi_bonifica: Decimal,
    /// Denomination snapshot.
    pub vdi_detalle1: String,
    /// Unit snapshot.
    pub vdi_detalle2: Option<String>,
    pub vdi_idaliiva: i32,
    /// Authoritative final unit price (IVA included) when the line was
    /// priced from a list instead of cost+margin.
    pub vdi_precio_unitario_final: Option<Decimal>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ventas::Entity",
        from = "Column::VdiIdve",
        to = "super::ventas::Column::Id"
    )]
    Ventas,
    #[sea_orm(
        belongs_to = "super::alicuotas_iva::Entity",
        from = "Column::VdiIdaliiva",
        to = "super::alicuotas_iva::Column::Id"
    )]
    AlicuotasIva,
}

impl Related<super::ventas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ventas.def()
    }
}

impl Related<super::alicuotas_iva::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlicuotasIva.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
