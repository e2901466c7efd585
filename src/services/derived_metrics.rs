//! Motor de métricas derivadas
//!
//! Cálculo puro de distancia/horas transcurridas y eficiencia de combustible
//! entre un registro nuevo y el registro anterior del mismo asset. Sin
//! efectos secundarios y sin paths de error: una entrada irresoluble
//! simplemente produce None.

use rust_decimal::Decimal;

use crate::models::fuel_record::FuelRecord;

/// Resultado del motor: los tres campos derivados, todos anulables
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub distance_since_last: Option<Decimal>,
    pub hours_since_last: Option<Decimal>,
    pub fuel_efficiency: Option<Decimal>,
}

impl DerivedMetrics {
    pub fn empty() -> Self {
        Self {
            distance_since_last: None,
            hours_since_last: None,
            fuel_efficiency: None,
        }
    }
}

/// Delta entre lecturas consecutivas. Un delta negativo (p.ej. un registro
/// backfilled fuera de orden) se trata como "no computable", no como error.
fn reading_delta(current: Option<Decimal>, previous: Option<Decimal>) -> Option<Decimal> {
    match (current, previous) {
        (Some(new), Some(prior)) => {
            let delta = new - prior;
            if delta >= Decimal::ZERO {
                Some(delta)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Calcular las métricas derivadas de un registro nuevo contra el registro
/// anterior más reciente del asset (con transaction_date estrictamente
/// anterior).
///
/// Eficiencia: litros por 100 unidades de distancia si hay distancia
/// positiva; si no, litros por hora si hay horas positivas; si no, None.
/// La eficiencia por distancia siempre tiene preferencia sobre la de horas.
pub fn compute(
    quantity: Decimal,
    odometer_reading: Option<Decimal>,
    hours_reading: Option<Decimal>,
    previous: Option<&FuelRecord>,
) -> DerivedMetrics {
    let Some(prior) = previous else {
        return DerivedMetrics::empty();
    };

    let distance_since_last = reading_delta(odometer_reading, prior.odometer_reading);
    let hours_since_last = reading_delta(hours_reading, prior.hours_reading);

    let fuel_efficiency = match (distance_since_last, hours_since_last) {
        (Some(distance), _) if distance > Decimal::ZERO => {
            Some(quantity / distance * Decimal::ONE_HUNDRED)
        }
        (_, Some(hours)) if hours > Decimal::ZERO => Some(quantity / hours),
        _ => None,
    };

    DerivedMetrics {
        distance_since_last,
        hours_since_last,
        fuel_efficiency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn prior_record(odometer: Option<Decimal>, hours: Option<Decimal>) -> FuelRecord {
        FuelRecord {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            asset_id: Uuid::new_v4(),
            transaction_date: Utc::now(),
            transaction_type: "purchase".to_string(),
            fuel_type: "diesel".to_string(),
            quantity: Decimal::new(40, 0),
            unit_price: Decimal::new(150, 2),
            total_cost: Decimal::new(6000, 2),
            odometer_reading: odometer,
            hours_reading: hours,
            distance_since_last: None,
            hours_since_last: None,
            fuel_efficiency: None,
            site: None,
            submitted_by: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_previous_record_yields_all_none() {
        let metrics = compute(Decimal::new(50, 0), Some(Decimal::new(1000, 0)), None, None);
        assert_eq!(metrics, DerivedMetrics::empty());
    }

    #[test]
    fn test_distance_is_difference_of_odometers() {
        let prior = prior_record(Some(Decimal::new(1000, 0)), None);
        let metrics = compute(
            Decimal::new(50, 0),
            Some(Decimal::new(1500, 0)),
            None,
            Some(&prior),
        );
        assert_eq!(metrics.distance_since_last, Some(Decimal::new(500, 0)));
        // 50 / 500 * 100 = 10 L/100km
        assert_eq!(metrics.fuel_efficiency, Some(Decimal::new(10, 0)));
    }

    #[test]
    fn test_negative_delta_is_not_computable() {
        let prior = prior_record(Some(Decimal::new(1500, 0)), None);
        let metrics = compute(
            Decimal::new(50, 0),
            Some(Decimal::new(1000, 0)),
            None,
            Some(&prior),
        );
        assert_eq!(metrics.distance_since_last, None);
        assert_eq!(metrics.fuel_efficiency, None);
    }

    #[test]
    fn test_distance_preferred_over_hours() {
        let prior = prior_record(Some(Decimal::new(1000, 0)), Some(Decimal::new(200, 0)));
        let metrics = compute(
            Decimal::new(40, 0),
            Some(Decimal::new(1200, 0)),
            Some(Decimal::new(220, 0)),
            Some(&prior),
        );
        assert_eq!(metrics.distance_since_last, Some(Decimal::new(200, 0)));
        assert_eq!(metrics.hours_since_last, Some(Decimal::new(20, 0)));
        // Preferencia por distancia: 40 / 200 * 100 = 20
        assert_eq!(metrics.fuel_efficiency, Some(Decimal::new(20, 0)));
    }

    #[test]
    fn test_hours_based_efficiency_when_no_odometer() {
        let prior = prior_record(None, Some(Decimal::new(200, 0)));
        let metrics = compute(
            Decimal::new(40, 0),
            None,
            Some(Decimal::new(210, 0)),
            Some(&prior),
        );
        assert_eq!(metrics.hours_since_last, Some(Decimal::new(10, 0)));
        // 40 / 10 = 4 L/h
        assert_eq!(metrics.fuel_efficiency, Some(Decimal::new(4, 0)));
    }

    #[test]
    fn test_zero_distance_falls_back_to_hours() {
        let prior = prior_record(Some(Decimal::new(1000, 0)), Some(Decimal::new(100, 0)));
        let metrics = compute(
            Decimal::new(20, 0),
            Some(Decimal::new(1000, 0)),
            Some(Decimal::new(105, 0)),
            Some(&prior),
        );
        assert_eq!(metrics.distance_since_last, Some(Decimal::ZERO));
        assert_eq!(metrics.fuel_efficiency, Some(Decimal::new(4, 0)));
    }
}
