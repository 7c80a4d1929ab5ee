//! Common types used across the application.

pub mod redondeo;

pub use redondeo::{round2, round3, round4};
