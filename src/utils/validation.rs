//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos en la frontera de la API. Los campos numéricos
//! cruzan la frontera como strings decimales y se parsean a Decimal
//! (nunca floats binarios) para mantener exacta la aritmética de
//! costos y balances.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::utils::errors::AppError;

/// Parsear un string decimal de la frontera de la API
pub fn parse_decimal(field: &str, value: &str) -> Result<Decimal, AppError> {
    Decimal::from_str_exact(value.trim())
        .map_err(|_| AppError::Validation(format!("{} must be a valid decimal number", field)))
}

/// Parsear un string decimal opcional
pub fn parse_optional_decimal(field: &str, value: Option<&str>) -> Result<Option<Decimal>, AppError> {
    match value {
        Some(v) => parse_decimal(field, v).map(Some),
        None => Ok(None),
    }
}

/// Parsear un decimal que debe ser estrictamente positivo
pub fn parse_positive_decimal(field: &str, value: &str) -> Result<Decimal, AppError> {
    let parsed = parse_decimal(field, value)?;
    if parsed <= Decimal::ZERO {
        return Err(AppError::Validation(format!("{} must be greater than zero", field)));
    }
    Ok(parsed)
}

/// Parsear un decimal que no puede ser negativo
pub fn parse_non_negative_decimal(field: &str, value: &str) -> Result<Decimal, AppError> {
    let parsed = parse_decimal(field, value)?;
    if parsed < Decimal::ZERO {
        return Err(AppError::Validation(format!("{} cannot be negative", field)));
    }
    Ok(parsed)
}

/// Una lectura acumulativa (odómetro, horas) nunca puede retroceder
/// respecto al snapshot cacheado del asset. Si falta cualquiera de los
/// dos lados no hay nada que comparar.
pub fn check_monotonic_reading(
    field: &str,
    reading: Option<Decimal>,
    current: Option<Decimal>,
) -> Result<(), AppError> {
    if let (Some(reading), Some(current)) = (reading, current) {
        if reading < current {
            return Err(AppError::Validation(format!(
                "{} reading cannot be less than the asset's current value",
                field
            )));
        }
    }
    Ok(())
}

/// Parsear una fecha ISO-8601/RFC3339 de la frontera de la API
pub fn parse_datetime(field: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AppError::Validation(format!("{} must be a valid ISO-8601 datetime", field)))
}

/// Parsear una fecha opcional
pub fn parse_optional_datetime(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    match value {
        Some(v) => parse_datetime(field, v).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_exact() {
        let d = parse_decimal("quantity", "45.50").unwrap();
        assert_eq!(d.to_string(), "45.50");
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(parse_decimal("quantity", "45.5.0").is_err());
        assert!(parse_decimal("quantity", "NaN").is_err());
        assert!(parse_decimal("quantity", "").is_err());
    }

    #[test]
    fn test_parse_positive_decimal_rejects_zero_and_negative() {
        assert!(parse_positive_decimal("quantity", "0").is_err());
        assert!(parse_positive_decimal("quantity", "-3").is_err());
        assert!(parse_positive_decimal("quantity", "0.001").is_ok());
    }

    #[test]
    fn test_monotonic_reading_rejects_rollback() {
        // lectura 95 contra snapshot cacheado 100
        let err = check_monotonic_reading(
            "Odometer",
            Some(Decimal::new(95, 0)),
            Some(Decimal::new(100, 0)),
        )
        .unwrap_err();
        assert!(err.to_string().contains("Odometer"));
    }

    #[test]
    fn test_monotonic_reading_allows_equal_and_forward() {
        assert!(check_monotonic_reading(
            "Odometer",
            Some(Decimal::new(100, 0)),
            Some(Decimal::new(100, 0)),
        )
        .is_ok());
        assert!(check_monotonic_reading(
            "Hours",
            Some(Decimal::new(1205, 1)),
            Some(Decimal::new(1200, 1)),
        )
        .is_ok());
    }

    #[test]
    fn test_monotonic_reading_skips_missing_sides() {
        assert!(check_monotonic_reading("Odometer", None, Some(Decimal::ONE)).is_ok());
        assert!(check_monotonic_reading("Odometer", Some(Decimal::ONE), None).is_ok());
    }

    #[test]
    fn test_parse_datetime_rfc3339() {
        let dt = parse_datetime("transaction_date", "2025-06-01T10:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T10:30:00+00:00");
        assert!(parse_datetime("transaction_date", "01/06/2025").is_err());
    }
}
