//! `SeaORM` Entity for sales document headers.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "ventas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub sucursal: i16,
    pub fecha: Date,
    pub hora_creacion: DateTimeWithTimeZone,
    pub comprobante_id: i32,
    pub ven_punto: i32,
    pub ven_numero: i64,
    pub cliente_id: Option<i32>,
    // Fiscal snapshot of the customer, copied at issuance.
    pub cuit: Option<String>,
    pub dni: Option<String>,
    pub razon_social: Option<String>,
    pub domicilio: Option<String>,
    pub tipo_iva_id: Option<i32>,
    pub ven_descu1: Decimal,
    pub ven_descu2: Decimal,
    pub ven_descu3: Decimal,
    pub ven_descuento_cierre: Decimal,
    pub bonificacion_general: Decimal,
    pub observacion: Option<String>,
    /// AB issued, AN voided.
    pub estado: String,
    pub cae: Option<String>,
    pub cae_vencimiento: Option<Date>,
    pub qr_payload: Option<String>,
    /// Quote validity date.
    pub vencimiento: Option<Date>,
    pub convertida_a_fiscal: bool,
    pub factura_fiscal_convertida: Option<i32>,
    pub fecha_conversion: Option<DateTimeWithTimeZone>,
    // Cobro audit.
    pub cobro_bruto: Option<Decimal>,
    pub vuelto_calculado: Option<Decimal>,
    /// vuelto, propina or vuelto_pendiente.
    pub excedente_destino: Option<String>,
    pub excedente_justificacion: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::venta_detalle_items::Entity")]
    VentaDetalleItems,
    #[sea_orm(
        belongs_to = "super::comprobantes::Entity",
        from = "Column::ComprobanteId",
        to = "super::comprobantes::Column::Id"
    )]
    Comprobantes,
    #[sea_orm(
        belongs_to = "super::clientes::Entity",
        from = "Column::ClienteId",
        to = "super::clientes::Column::Id"
    )]
    Clientes,
}

impl Related<super::venta_detalle_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VentaDetalleItems.def()
    }
}

impl Related<super::comprobantes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comprobantes.def()
    }
}

impl Related<super::clientes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clientes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
