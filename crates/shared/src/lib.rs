//! Shared types, errors, and configuration for FerreDesk.
//!
//! This crate provides common types used across all other crates:
//! - Decimal rounding helpers for monetary derivation
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
