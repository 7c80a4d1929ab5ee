//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod caja;
pub mod compra;
pub mod cuenta_corriente;
pub mod ferreteria;
pub mod form_lock;
pub mod imputacion;
pub mod lista_precio;
pub mod reserva;
mod totales;
pub mod venta;

pub use caja::{CajaError, CajaRepository, CreateChequeInput, PagoVentaInput};
pub use compra::{
    CompraError, CompraRepository, CreateCompraInput, CreateCompraItemInput,
    CreateOrdenCompraInput,
};
pub use cuenta_corriente::{CuentaCorrienteError, CuentaCorrienteRepository};
pub use ferreteria::{FerreteriaError, FerreteriaRepository};
pub use form_lock::{FormLockError, FormLockRepository};
pub use imputacion::{CreateImputacionInput, ImputacionError, ImputacionRepository};
pub use lista_precio::{ListaPrecioError, ListaPrecioRepository, ResumenRecalculo};
pub use reserva::{CreateReservaInput, ReservaError, ReservaRepository};
pub use venta::{
    AutoridadFiscal, CaeOtorgado, CreateVentaInput, CreateVentaItemInput, VentaCalculada,
    VentaError, VentaRepository,
};
