//! Cuenta corriente engine.
//!
//! Produces, for one party (customer or supplier), an ordered stream of
//! movements with running balances from the party's documents and the
//! imputation links between them. The engine is pure: the repository layer
//! projects database rows into [`DocumentoCc`]/[`ImputacionCc`] and renders
//! the resulting [`MovimientoCc`] stream.

pub mod error;
pub mod stream;
pub mod tipos;

pub use error::CuentaCorrienteError;
pub use stream::{DocumentoCc, ImputacionCc, MovimientoCc, armar_stream};
pub use tipos::{KindCc, Lado, TipoCc};
