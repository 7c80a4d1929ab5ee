//! Document calculation engine.
//!
//! Deterministic derivation of per-line and per-document monetary values
//! from the stored base fields. This engine is the single source of truth:
//! it is invoked for live serialization and by verification harnesses that
//! re-run the formulae over persisted documents.

pub mod documento;
pub mod error;
pub mod linea;

pub use documento::{BucketIva, DocumentoCalculado, calcular_documento};
pub use error::CalculoError;
pub use linea::{DescuentosCabecera, LineaBase, LineaCalculada, calcular_linea};
