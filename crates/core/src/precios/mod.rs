//! Price-list derivation.
//!
//! Five lists indexed 0..=4. List 0 is the base price, derived from the
//! habitual supplier's cost and the product margin unless flagged manual.
//! Lists 1..=4 apply a signed percentage over list 0, with per-product
//! manual overrides taking precedence. Derived prices are never stored;
//! they are computed at read time from these functions.

use rust_decimal::Decimal;
use thiserror::Error;

use ferredesk_shared::types::round2;

/// Highest valid list number.
pub const LISTA_MAX: u8 = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PreciosError {
    /// List 0 recalc goes through the cost-change path, never the
    /// multi-list API; numbers above 4 do not exist.
    #[error("la lista {0} no es recalculable por este medio")]
    ListaNoRecalculable(u8),
}

/// How a resolved price was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrigenPrecio {
    /// Derived from list 0 and the list's percentage.
    Derivado,
    /// A manual per-product override.
    Manual,
}

/// A resolved per-product, per-list price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrecioResuelto {
    pub precio: Decimal,
    pub origen: OrigenPrecio,
}

fn cien() -> Decimal {
    Decimal::ONE_HUNDRED
}

/// Base price: cost of the habitual supplier marked up by the product margin.
#[must_use]
pub fn precio_lista_0(costo_habitual: Decimal, margen: Decimal) -> Decimal {
    round2(costo_habitual * (Decimal::ONE + margen / cien()))
}

/// Derived price for lists 1..=4. `margen_descuento` is signed: negative
/// values discount against list 0, positive values surcharge.
#[must_use]
pub fn precio_lista_derivado(precio_lista_0: Decimal, margen_descuento: Decimal) -> Decimal {
    round2(precio_lista_0 * (Decimal::ONE + margen_descuento / cien()))
}

/// Resolves the effective price for a list, preferring a manual override.
#[must_use]
pub fn resolver_precio(
    precio_lista_0: Decimal,
    margen_descuento: Decimal,
    override_manual: Option<Decimal>,
) -> PrecioResuelto {
    match override_manual {
        Some(precio) => PrecioResuelto {
            precio,
            origen: OrigenPrecio::Manual,
        },
        None => PrecioResuelto {
            precio: precio_lista_derivado(precio_lista_0, margen_descuento),
            origen: OrigenPrecio::Derivado,
        },
    }
}

/// Guards the multi-list recalc endpoint: only lists 1..=4 qualify.
///
/// # Errors
///
/// Returns an error for list 0 and for any number above [`LISTA_MAX`].
pub fn validar_lista_recalculable(numero: u8) -> Result<(), PreciosError> {
    if numero == 0 || numero > LISTA_MAX {
        return Err(PreciosError::ListaNoRecalculable(numero));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_precio_lista_0_markup() {
        assert_eq!(precio_lista_0(dec!(100), dec!(40)), dec!(140.00));
        assert_eq!(precio_lista_0(dec!(33.33), dec!(21.5)), dec!(40.50));
    }

    #[test]
    fn test_precio_lista_0_manual_flag_handled_upstream() {
        // Cost zero yields a zero base; the manual flag short-circuits
        // before this function is reached.
        assert_eq!(precio_lista_0(Decimal::ZERO, dec!(40)), Decimal::ZERO);
    }

    #[test]
    fn test_derivado_descuento_y_recargo() {
        assert_eq!(precio_lista_derivado(dec!(140), dec!(-10)), dec!(126.00));
        assert_eq!(precio_lista_derivado(dec!(140), dec!(5)), dec!(147.00));
        assert_eq!(precio_lista_derivado(dec!(140), Decimal::ZERO), dec!(140.00));
    }

    #[test]
    fn test_resolver_prefiere_override() {
        let r = resolver_precio(dec!(140), dec!(-10), Some(dec!(99.90)));
        assert_eq!(r.precio, dec!(99.90));
        assert_eq!(r.origen, OrigenPrecio::Manual);

        let r = resolver_precio(dec!(140), dec!(-10), None);
        assert_eq!(r.precio, dec!(126.00));
        assert_eq!(r.origen, OrigenPrecio::Derivado);
    }

    #[test]
    fn test_validacion_de_numero_de_lista() {
        assert_eq!(
            validar_lista_recalculable(0),
            Err(PreciosError::ListaNoRecalculable(0))
        );
        assert_eq!(
            validar_lista_recalculable(5),
            Err(PreciosError::ListaNoRecalculable(5))
        );
        for n in 1..=4 {
            assert!(validar_lista_recalculable(n).is_ok());
        }
    }

    #[test]
    fn test_redondeo_mitad_lejos_de_cero() {
        // 100 * 1.12345 = 112.345 -> 112.35 away from zero.
        assert_eq!(precio_lista_0(dec!(100), dec!(12.345)), dec!(112.35));
    }
}
