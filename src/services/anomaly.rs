//! Clasificación de anomalías de consumo
//!
//! Regla pura: un registro se marca HIGH_CONSUMPTION si su eficiencia supera
//! 1.5x la media del asset, LOW_CONSUMPTION si queda por debajo de 0.5x.
//! Un asset sin registros elegibles no produce anomalías.

use rust_decimal::Decimal;
use serde::Serialize;

/// Tipo de anomalía detectada
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum AnomalyKind {
    #[serde(rename = "HIGH_CONSUMPTION")]
    HighConsumption,
    #[serde(rename = "LOW_CONSUMPTION")]
    LowConsumption,
}

const HIGH_FACTOR: Decimal = Decimal::from_parts(15, 0, 0, false, 1); // 1.5
const LOW_FACTOR: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5

/// Clasificar una eficiencia contra la media del asset
pub fn classify(efficiency: Decimal, asset_mean: Decimal) -> Option<AnomalyKind> {
    if asset_mean <= Decimal::ZERO {
        return None;
    }
    if efficiency > asset_mean * HIGH_FACTOR {
        Some(AnomalyKind::HighConsumption)
    } else if efficiency < asset_mean * LOW_FACTOR {
        Some(AnomalyKind::LowConsumption)
    } else {
        None
    }
}

/// Media de un conjunto de eficiencias no nulas; None si está vacío
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let total: Decimal = values.iter().copied().sum();
    Some(total / Decimal::from(values.len() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_history_yields_no_anomalies() {
        let values = vec![Decimal::new(10, 0); 8];
        let m = mean(&values).unwrap();
        assert_eq!(m, Decimal::new(10, 0));
        for v in &values {
            assert_eq!(classify(*v, m), None);
        }
    }

    #[test]
    fn test_high_consumption_above_factor() {
        let m = Decimal::new(10, 0);
        assert_eq!(classify(Decimal::new(16, 0), m), Some(AnomalyKind::HighConsumption));
        // exactamente 1.5x no se marca
        assert_eq!(classify(Decimal::new(15, 0), m), None);
    }

    #[test]
    fn test_low_consumption_below_factor() {
        let m = Decimal::new(10, 0);
        assert_eq!(classify(Decimal::new(4, 0), m), Some(AnomalyKind::LowConsumption));
        // exactamente 0.5x no se marca
        assert_eq!(classify(Decimal::new(5, 0), m), None);
    }

    #[test]
    fn test_empty_history_has_no_mean() {
        assert_eq!(mean(&[]), None);
    }
}
