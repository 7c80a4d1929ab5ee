//! Core business logic for FerreDesk.
//!
//! This crate hosts the deterministic engines of the system, free of web and
//! database dependencies so they can be unit-tested in isolation:
//!
//! - [`calculo`]: per-line and per-document monetary derivation
//! - [`comprobante`]: document type catalog, numbering format, state machine
//! - [`arca`]: AFIP payload assembly and QR generation (pure parts)
//! - [`cc`]: cuenta corriente movement streams with running balances
//! - [`precios`]: 5-tier derived price lists with manual overrides

pub mod arca;
pub mod calculo;
pub mod cc;
pub mod comprobante;
pub mod precios;
