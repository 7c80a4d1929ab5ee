//! Form lock repository: advisory single-writer locks over shared sales
//! forms (venta, presupuesto edit, conversion).

use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use ferredesk_shared::error::AppError;

use crate::entities::form_locks;

/// Error types for form lock operations.
#[derive(Debug, thiserror::Error)]
pub enum FormLockError {
    /// Another session already holds the lock.
    #[error("El formulario está siendo editado por {usuario}")]
    Ocupado { usuario: String },

    /// The lock does not exist or expired.
    #[error("Lock no encontrado: {0}")]
    NotFound(i32),

    /// The session does not own the lock it tries to touch.
    #[error("El lock {0} pertenece a otra sesión")]
    SesionAjena(i32),

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<FormLockError> for AppError {
    fn from(err: FormLockError) -> Self {
        match err {
            FormLockError::Ocupado { .. } => Self::Conflict(err.to_string()),
            FormLockError::NotFound(_) => Self::NotFound(err.to_string()),
            FormLockError::SesionAjena(_) => Self::Conflict(err.to_string()),
            FormLockError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// Form lock repository.
#[derive(Debug, Clone)]
pub struct FormLockRepository {
    db: DatabaseConnection,
}

impl FormLockRepository {
    /// Creates a new form lock repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Acquires the lock for a form, purging expired holders first. When a
    /// live holder exists the error names them so the caller can show who
    /// is editing. The partial unique index on `(tipo, presupuesto_id)`
    /// closes the check-then-insert race: the loser's insert fails.
    ///
    /// # Errors
    ///
    /// Returns [`FormLockError::Ocupado`] when another session holds the
    /// lock, and database errors otherwise.
    pub async fn adquirir(
        &self,
        tipo: &str,
        usuario: &str,
        sesion: Uuid,
        presupuesto_id: Option<i32>,
        ttl_minutos: i64,
    ) -> Result<form_locks::Model, FormLockError> {
        let txn = self.db.begin().await?;
        let ahora = Utc::now();

        form_locks::Entity::delete_many()
            .filter(form_locks::Column::Tipo.eq(tipo))
            .filter(form_locks::Column::PresupuestoId.eq(presupuesto_id))
            .filter(form_locks::Column::ExpiraEn.lte(ahora))
            .exec(&txn)
            .await?;

        let vivo = form_locks::Entity::find()
            .filter(form_locks::Column::Tipo.eq(tipo))
            .filter(form_locks::Column::PresupuestoId.eq(presupuesto_id))
            .filter(form_locks::Column::ExpiraEn.gt(ahora))
            .one(&txn)
            .await?;
        if let Some(vivo) = vivo {
            if vivo.sesion == sesion {
                // Re-entrant acquire by the same session renews the hold.
                let mut activo: form_locks::ActiveModel = vivo.into();
                activo.expira_en = Set((ahora + Duration::minutes(ttl_minutos)).into());
                let renovado = activo.update(&txn).await?;
                txn.commit().await?;
                return Ok(renovado);
            }
            return Err(FormLockError::Ocupado {
                usuario: vivo.usuario,
            });
        }

        let lock = form_locks::ActiveModel {
            tipo: Set(tipo.to_string()),
            usuario: Set(usuario.to_string()),
            sesion: Set(sesion),
            presupuesto_id: Set(presupuesto_id),
            adquirido_en: Set(ahora.into()),
            expira_en: Set((ahora + Duration::minutes(ttl_minutos)).into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(lock)
    }

    /// Extends a held lock. Only the owning session may renew.
    ///
    /// # Errors
    ///
    /// Returns an error when the lock is gone, owned by another session,
    /// or the database fails.
    pub async fn renovar(
        &self,
        lock_id: i32,
        sesion: Uuid,
        ttl_minutos: i64,
    ) -> Result<form_locks::Model, FormLockError> {
        let lock = form_locks::Entity::find_by_id(lock_id)
            .one(&self.db)
            .await?
            .ok_or(FormLockError::NotFound(lock_id))?;
        if lock.sesion != sesion {
            return Err(FormLockError::SesionAjena(lock_id));
        }

        let mut activo: form_locks::ActiveModel = lock.into();
        activo.expira_en = Set((Utc::now() + Duration::minutes(ttl_minutos)).into());
        Ok(activo.update(&self.db).await?)
    }

    /// Releases a held lock. Only the owning session may release; a missing
    /// lock is not an error (it may have expired and been purged).
    ///
    /// # Errors
    ///
    /// Returns an error when the lock belongs to another session or the
    /// database fails.
    pub async fn liberar(&self, lock_id: i32, sesion: Uuid) -> Result<(), FormLockError> {
        let Some(lock) = form_locks::Entity::find_by_id(lock_id).one(&self.db).await? else {
            return Ok(());
        };
        if lock.sesion != sesion {
            return Err(FormLockError::SesionAjena(lock_id));
        }
        form_locks::Entity::delete_by_id(lock_id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Deletes every expired lock. Run periodically so abandoned sessions
    /// do not keep forms busy until the next acquire attempt.
    ///
    /// # Errors
    ///
    /// Returns an error when the database fails.
    pub async fn barrer_expirados(&self) -> Result<u64, FormLockError> {
        let resultado = form_locks::Entity::delete_many()
            .filter(form_locks::Column::ExpiraEn.lte(Utc::now()))
            .exec(&self.db)
            .await?;
        Ok(resultado.rows_affected)
    }
}
