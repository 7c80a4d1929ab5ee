//! Application services orchestrating repositories and external clients.

pub mod fiscal;
pub mod ventas;

pub use fiscal::AutoridadArca;
pub use ventas::{EmisionInput, PagoInput, VentaEmitida, VentasService};
