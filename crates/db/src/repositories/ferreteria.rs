//! Ferreteria repository: access to the single business configuration row.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder};

use ferredesk_shared::error::AppError;

use crate::entities::ferreterias;

/// Error types for ferreteria operations.
#[derive(Debug, thiserror::Error)]
pub enum FerreteriaError {
    /// No configuration row exists yet.
    #[error("No hay ferretería configurada")]
    NoConfigurada,

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<FerreteriaError> for AppError {
    fn from(err: FerreteriaError) -> Self {
        match err {
            FerreteriaError::NoConfigurada => Self::State(err.to_string()),
            FerreteriaError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Ferreteria repository.
#[derive(Debug, Clone)]
pub struct FerreteriaRepository {
    db: DatabaseConnection,
}

impl FerreteriaRepository {
    /// Creates a new ferreteria repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the business configuration row. The table holds one row in
    /// practice; the lowest id wins if more exist.
    ///
    /// # Errors
    ///
    /// Returns [`FerreteriaError::NoConfigurada`] when the table is empty.
    pub async fn obtener(&self) -> Result<ferreterias::Model, FerreteriaError> {
        ferreterias::Entity::find()
            .order_by_asc(ferreterias::Column::Id)
            .one(&self.db)
            .await?
            .ok_or(FerreteriaError::NoConfigurada)
    }
}
