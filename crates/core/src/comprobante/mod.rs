//! Document type catalog, numbering format, and sales state machine.

pub mod estado;
pub mod tipos;

pub use estado::{
    EstadoError, EstadoVenta, es_operacion_efectiva, puede_anular, puede_convertir,
    puede_modificar,
};
pub use tipos::{ComprobanteError, Letra, TipoComprobante, cbte_tipo, numero_formateado};
