//! Shared projection of stored venta lines into calculation-engine input.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

use ferredesk_core::calculo::{DescuentosCabecera, LineaBase};

use crate::entities::{alicuotas_iva, venta_detalle_items, ventas};

/// Loads a venta's lines as engine input, resolving each line's IVA rate
/// from the catalog.
pub(crate) async fn cargar_lineas<C: ConnectionTrait>(
    conn: &C,
    venta_id: i32,
) -> Result<Vec<LineaBase>, DbErr> {
    let items = venta_detalle_items::Entity::find()
        .filter(venta_detalle_items::Column::VdiIdve.eq(venta_id))
        .all(conn)
        .await?;
    let rates = alicuotas_iva::Entity::find().all(conn).await?;
    Ok(proyectar_lineas(&items, &rates))
}

/// Pure projection used when the rows are already in hand.
pub(crate) fn proyectar_lineas(
    items: &[venta_detalle_items::Model],
    rates: &[alicuotas_iva::Model],
) -> Vec<LineaBase> {
    let porcentaje = |id: i32| -> Decimal {
        rates
            .iter()
            .find(|r| r.id == id)
            .map_or(Decimal::ZERO, |r| r.porce)
    };
    items
        .iter()
        .map(|i| LineaBase {
            orden: u32::try_from(i.vdi_orden).unwrap_or(0),
            cantidad: i.vdi_cantidad,
            costo: i.vdi_costo,
            margen: i.vdi_margen,
            bonifica: i.vdi_bonifica,
            ali_porce: porcentaje(i.vdi_idaliiva),
            precio_unitario_final: i.vdi_precio_unitario_final,
        })
        .collect()
}

/// Header discounts of a venta as engine input.
pub(crate) const fn descuentos(venta: &ventas::Model) -> DescuentosCabecera {
    DescuentosCabecera {
        descu1: venta.ven_descu1,
        descu2: venta.ven_descu2,
        descu3: venta.ven_descu3,
    }
}
