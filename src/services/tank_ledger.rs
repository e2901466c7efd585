//! Aritmética de balances del ledger de tanques
//!
//! Los checks de capacidad y de nivel insuficiente viven aquí como funciones
//! puras; el controller las invoca dentro de la transacción, con el tanque
//! ya bloqueado por FOR UPDATE.

use rust_decimal::Decimal;

use crate::utils::errors::AppError;

/// Balance resultante de un refill. Rechaza sobrepasar la capacidad;
/// llegar exactamente a la capacidad es válido.
pub fn refill_balance(
    current_level: Decimal,
    capacity: Decimal,
    quantity: Decimal,
) -> Result<Decimal, AppError> {
    let balance_after = current_level + quantity;
    if balance_after > capacity {
        return Err(AppError::Validation(format!(
            "Refill of {} would exceed tank capacity ({} / {})",
            quantity, current_level, capacity
        )));
    }
    Ok(balance_after)
}

/// Balance resultante de un dispense. Rechaza dispensar más de lo almacenado;
/// vaciar el tanque hasta cero es válido.
pub fn dispense_balance(current_level: Decimal, quantity: Decimal) -> Result<Decimal, AppError> {
    if quantity > current_level {
        return Err(AppError::Validation(format!(
            "Insufficient tank level: {} available, {} requested",
            current_level, quantity
        )));
    }
    Ok(current_level - quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refill_over_capacity_is_rejected() {
        // nivel 400 en un tanque de 500: caben 100 exactos
        let capacity = Decimal::new(500, 0);
        let level = Decimal::new(400, 0);
        assert!(refill_balance(level, capacity, Decimal::new(150, 0)).is_err());
    }

    #[test]
    fn test_refill_to_exact_capacity_is_allowed() {
        let capacity = Decimal::new(500, 0);
        let level = Decimal::new(400, 0);
        let after = refill_balance(level, capacity, Decimal::new(100, 0)).unwrap();
        assert_eq!(after, capacity);
    }

    #[test]
    fn test_dispense_beyond_level_is_rejected() {
        let err = dispense_balance(Decimal::new(30, 0), Decimal::new(50, 0)).unwrap_err();
        assert!(err.to_string().contains("30 available, 50 requested"));
    }

    #[test]
    fn test_dispense_to_empty_is_allowed() {
        let after = dispense_balance(Decimal::new(30, 0), Decimal::new(30, 0)).unwrap();
        assert_eq!(after, Decimal::ZERO);
    }
}
