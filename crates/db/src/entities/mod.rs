//! `SeaORM` entity definitions.

pub mod actualizaciones_lista;
pub mod ajustes_proveedor;
pub mod alicuotas_iva;
pub mod cheques;
pub mod clientes;
pub mod compra_detalle_items;
pub mod compras;
pub mod comprobante_asociaciones;
pub mod comprobantes;
pub mod ferreterias;
pub mod form_locks;
pub mod imputaciones;
pub mod listas_precio;
pub mod metodos_pago;
pub mod movimientos_caja;
pub mod orden_compra_items;
pub mod ordenes_compra;
pub mod ordenes_pago;
pub mod pagos_venta;
pub mod precios_producto_lista;
pub mod proveedores;
pub mod recibos;
pub mod reservas_stock;
pub mod sesiones_caja;
pub mod stock;
pub mod stock_prove;
pub mod venta_contadores;
pub mod venta_detalle_items;
pub mod ventas;
