//! Caja repository: register sessions, audited movements, sale payments
//! and the cheque endorsement lifecycle.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QuerySelect, Set, TransactionTrait,
};

use ferredesk_shared::error::AppError;

use crate::entities::{cheques, metodos_pago, movimientos_caja, pagos_venta, sesiones_caja};

/// Error types for caja operations.
#[derive(Debug, thiserror::Error)]
pub enum CajaError {
    /// Session not found.
    #[error("Sesión de caja no encontrada: {0}")]
    SesionNoEncontrada(i32),

    /// The session is already closed.
    #[error("La sesión de caja {0} está cerrada")]
    SesionCerrada(i32),

    /// The user already has an open session.
    #[error("El usuario {0} ya tiene una sesión de caja abierta")]
    SesionYaAbierta(String),

    /// Unknown or inactive payment method.
    #[error("Método de pago inválido: {0}")]
    MetodoPagoInvalido(i32),

    /// Amounts must be positive.
    #[error("El monto debe ser positivo")]
    MontoNoPositivo,

    /// Cheque not found.
    #[error("Cheque no encontrado: {0}")]
    ChequeNoEncontrado(i32),

    /// Cheque transition not allowed from the current state.
    #[error("El cheque no puede pasar de {desde} a {hasta}")]
    TransicionCheque { desde: String, hasta: String },

    /// Database error.
    #[error("Error de base de datos: {0}")]
    Database(#[from] DbErr),
}

impl From<CajaError> for AppError {
    fn from(err: CajaError) -> Self {
        match err {
            CajaError::SesionNoEncontrada(_) | CajaError::ChequeNoEncontrado(_) => {
                Self::NotFound(err.to_string())
            }
            CajaError::SesionCerrada(_)
            | CajaError::SesionYaAbierta(_)
            | CajaError::TransicionCheque { .. } => Self::State(err.to_string()),
            CajaError::MetodoPagoInvalido(_) | CajaError::MontoNoPositivo => {
                Self::Validation(err.to_string())
            }
            CajaError::Database(_) => Self::Database(err.to_string()),
        }
    }
}

/// One payment leg of a sale.
#[derive(Debug, Clone)]
pub struct PagoVentaInput {
    pub metodo_pago_id: i32,
    pub monto: Decimal,
}

/// Input for registering a cheque received from a client.
#[derive(Debug, Clone)]
pub struct CreateChequeInput {
    pub numero: String,
    pub banco: String,
    pub importe: Decimal,
    pub fecha_emision: NaiveDate,
    pub cliente_id: Option<i32>,
}

/// Caja repository for register-session persistence.
#[derive(Debug, Clone)]
pub struct CajaRepository {
    db: DatabaseConnection,
}

impl CajaRepository {
    /// Creates a new caja repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Opens a register session for a user. A user holds at most one open
    /// session at a time.
    ///
    /// # Errors
    ///
    /// Returns [`CajaError::SesionYaAbierta`] when the user already has an
    /// open session.
    pub async fn abrir_sesion(
        &self,
        usuario: &str,
        saldo_inicial: Decimal,
    ) -> Result<sesiones_caja::Model, CajaError> {
        let txn = self.db.begin().await?;

        let abierta = sesiones_caja::Entity::find()
            .filter(sesiones_caja::Column::Usuario.eq(usuario))
            .filter(sesiones_caja::Column::Estado.eq("ABIERTA"))
            .lock_exclusive()
            .one(&txn)
            .await?;
        if abierta.is_some() {
            return Err(CajaError::SesionYaAbierta(usuario.to_string()));
        }

        let sesion = sesiones_caja::ActiveModel {
            usuario: Set(usuario.to_string()),
            abierta_en: Set(Utc::now().into()),
            saldo_inicial: Set(saldo_inicial),
            estado: Set("ABIERTA".to_string()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(sesion)
    }

    /// Closes a session, recording the counted closing balance. Any
    /// difference against the movements is the operator's to explain; no
    /// arqueo report is produced here.
    ///
    /// # Errors
    ///
    /// Returns an error when the session does not exist or is already
    /// closed.
    pub async fn cerrar_sesion(
        &self,
        sesion_id: i32,
        saldo_cierre: Decimal,
    ) -> Result<sesiones_caja::Model, CajaError> {
        let txn = self.db.begin().await?;

        let sesion = self.sesion_abierta(&txn, sesion_id).await?;
        let mut activo: sesiones_caja::ActiveModel = sesion.into();
        activo.estado = Set("CERRADA".to_string());
        activo.cerrada_en = Set(Some(Utc::now().into()));
        activo.saldo_cierre = Set(Some(saldo_cierre));
        let cerrada = activo.update(&txn).await?;

        txn.commit().await?;
        Ok(cerrada)
    }

    /// Records the payment legs of a sale. Every leg is stored as a
    /// `pagos_venta` row; legs whose method has `afecta_arqueo` also write
    /// an INGRESO movement against the session.
    ///
    /// # Errors
    ///
    /// Returns an error when the session is closed, a method is unknown or
    /// inactive, or an amount is not positive.
    pub async fn registrar_pagos_venta(
        &self,
        sesion_id: i32,
        venta_id: i32,
        concepto: &str,
        pagos: &[PagoVentaInput],
    ) -> Result<Vec<movimientos_caja::Model>, CajaError> {
        let txn = self.db.begin().await?;
        self.sesion_abierta(&txn, sesion_id).await?;

        let ahora = Utc::now();
        let mut movimientos = Vec::new();
        for pago in pagos {
            if pago.monto <= Decimal::ZERO {
                return Err(CajaError::MontoNoPositivo);
            }
            let metodo = metodos_pago::Entity::find_by_id(pago.metodo_pago_id)
                .one(&txn)
                .await?
                .filter(|metodo| metodo.activo)
                .ok_or(CajaError::MetodoPagoInvalido(pago.metodo_pago_id))?;

            pagos_venta::ActiveModel {
                venta_id: Set(venta_id),
                metodo_pago_id: Set(metodo.id),
                monto: Set(pago.monto),
                creado_en: Set(ahora.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            if metodo.afecta_arqueo {
                let movimiento = movimientos_caja::ActiveModel {
                    sesion_id: Set(sesion_id),
                    tipo: Set("INGRESO".to_string()),
                    concepto: Set(concepto.to_string()),
                    monto: Set(pago.monto),
                    metodo_pago_id: Set(Some(metodo.id)),
                    venta_id: Set(Some(venta_id)),
                    creado_en: Set(ahora.into()),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
                movimientos.push(movimiento);
            }
        }

        txn.commit().await?;
        Ok(movimientos)
    }

    /// Records the cash leg of an orden de pago as an EGRESO movement.
    ///
    /// # Errors
    ///
    /// Returns an error when the session is closed or the amount is not
    /// positive.
    pub async fn registrar_egreso_orden_pago(
        &self,
        sesion_id: i32,
        orden_pago_id: i32,
        concepto: &str,
        monto: Decimal,
    ) -> Result<movimientos_caja::Model, CajaError> {
        if monto <= Decimal::ZERO {
            return Err(CajaError::MontoNoPositivo);
        }

        let txn = self.db.begin().await?;
        self.sesion_abierta(&txn, sesion_id).await?;

        let movimiento = movimientos_caja::ActiveModel {
            sesion_id: Set(sesion_id),
            tipo: Set("EGRESO".to_string()),
            concepto: Set(concepto.to_string()),
            monto: Set(monto),
            orden_pago_id: Set(Some(orden_pago_id)),
            creado_en: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(movimiento)
    }

    /// Registers a cheque received from a client; it enters EN_CARTERA.
    ///
    /// # Errors
    ///
    /// Returns an error when the amount is not positive or the database
    /// fails.
    pub async fn registrar_cheque(
        &self,
        input: CreateChequeInput,
    ) -> Result<cheques::Model, CajaError> {
        if input.importe <= Decimal::ZERO {
            return Err(CajaError::MontoNoPositivo);
        }

        Ok(cheques::ActiveModel {
            numero: Set(input.numero),
            banco: Set(input.banco),
            importe: Set(input.importe),
            fecha_emision: Set(input.fecha_emision),
            estado: Set("EN_CARTERA".to_string()),
            cliente_id: Set(input.cliente_id),
            creado_en: Set(Utc::now().into()),
            ..Default::default()
        }
        .insert(&self.db)
        .await?)
    }

    /// Endorses a cheque in portfolio to a supplier or named third party
    /// (EN_CARTERA -> ENDOSADO).
    ///
    /// # Errors
    ///
    /// Returns an error when the cheque is not in portfolio.
    pub async fn endosar_cheque(
        &self,
        cheque_id: i32,
        endosado_a: &str,
        proveedor_id: Option<i32>,
    ) -> Result<cheques::Model, CajaError> {
        self.transicion_cheque(cheque_id, &["EN_CARTERA"], "ENDOSADO", |activo| {
            activo.endosado_a = Set(Some(endosado_a.to_string()));
            activo.proveedor_id = Set(proveedor_id);
        })
        .await
    }

    /// Deposits a cheque in portfolio (EN_CARTERA -> DEPOSITADO).
    ///
    /// # Errors
    ///
    /// Returns an error when the cheque is not in portfolio.
    pub async fn depositar_cheque(&self, cheque_id: i32) -> Result<cheques::Model, CajaError> {
        self.transicion_cheque(cheque_id, &["EN_CARTERA"], "DEPOSITADO", |_| {}).await
    }

    /// Marks a deposited cheque as collected (DEPOSITADO -> COBRADO).
    ///
    /// # Errors
    ///
    /// Returns an error when the cheque was not deposited.
    pub async fn cobrar_cheque(
        &self,
        cheque_id: i32,
        fecha_cobro: NaiveDate,
    ) -> Result<cheques::Model, CajaError> {
        self.transicion_cheque(cheque_id, &["DEPOSITADO"], "COBRADO", |activo| {
            activo.fecha_cobro = Set(Some(fecha_cobro));
        })
        .await
    }

    /// Marks a cheque as bounced, optionally linking the debit note raised
    /// against its issuer (DEPOSITADO|ENDOSADO -> RECHAZADO).
    ///
    /// # Errors
    ///
    /// Returns an error when the cheque was neither deposited nor
    /// endorsed.
    pub async fn rechazar_cheque(
        &self,
        cheque_id: i32,
        nota_debito_id: Option<i32>,
    ) -> Result<cheques::Model, CajaError> {
        self.transicion_cheque(cheque_id, &["DEPOSITADO", "ENDOSADO"], "RECHAZADO", |activo| {
            activo.nota_debito_id = Set(nota_debito_id);
        })
        .await
    }

    async fn sesion_abierta(
        &self,
        txn: &DatabaseTransaction,
        sesion_id: i32,
    ) -> Result<sesiones_caja::Model, CajaError> {
        let sesion = sesiones_caja::Entity::find_by_id(sesion_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(CajaError::SesionNoEncontrada(sesion_id))?;
        if sesion.estado != "ABIERTA" {
            return Err(CajaError::SesionCerrada(sesion_id));
        }
        Ok(sesion)
    }

    async fn transicion_cheque<F>(
        &self,
        cheque_id: i32,
        desde: &[&str],
        hasta: &str,
        aplicar: F,
    ) -> Result<cheques::Model, CajaError>
    where
        F: FnOnce(&mut cheques::ActiveModel),
    {
        let txn = self.db.begin().await?;

        let cheque = cheques::Entity::find_by_id(cheque_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CajaError::ChequeNoEncontrado(cheque_id))?;
        if !desde.contains(&cheque.estado.as_str()) {
            return Err(CajaError::TransicionCheque {
                desde: cheque.estado,
                hasta: hasta.to_string(),
            });
        }

        let mut activo: cheques::ActiveModel = cheque.into();
        activo.estado = Set(hasta.to_string());
        aplicar(&mut activo);
        let actualizado = activo.update(&txn).await?;

        txn.commit().await?;
        Ok(actualizado)
    }
}
