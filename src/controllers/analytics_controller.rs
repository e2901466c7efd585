//! Controller de analytics de combustible
//!
//! Agregación de solo lectura sobre el historial de fuel_records: resumen
//! de eficiencia, reporte de consumo agrupado y detección de anomalías.
//! Sin efectos secundarios; las queries están acotadas por caps de filas y
//! toleran la staleness normal de read-committed.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::analytics_dto::{
    AnalyticsWindowQuery, AnomalyReportResponse, AnomalyResponse, ConsumptionGroup,
    ConsumptionReportQuery, ConsumptionReportResponse, EfficiencyMean, FuelEfficiencyResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::fuel_record::FuelRecord;
use crate::repositories::fuel_record_repository::FuelRecordRepository;
use crate::services::anomaly;
use crate::utils::errors::AppError;
use crate::utils::permissions::{require_permission, Permission};
use crate::utils::validation::parse_datetime;

/// Cap duro de filas por query de analytics, para acotar latencia
const ANALYTICS_ROW_CAP: i64 = 5000;

/// Ventana rolling por defecto del resumen de eficiencia y consumo
const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Ventana rolling por defecto de la detección de anomalías
const DEFAULT_ANOMALY_DAYS: i64 = 60;

/// Dimensión de agrupación del reporte de consumo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupBy {
    Asset,
    Site,
    FuelType,
}

impl GroupBy {
    fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value {
            None | Some("asset") => Ok(GroupBy::Asset),
            Some("site") => Ok(GroupBy::Site),
            Some("fuel_type") => Ok(GroupBy::FuelType),
            Some(other) => Err(AppError::Validation(format!(
                "Unknown group_by '{}': expected asset, site or fuel_type",
                other
            ))),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            GroupBy::Asset => "asset",
            GroupBy::Site => "site",
            GroupBy::FuelType => "fuel_type",
        }
    }
}

/// Resolver la ventana temporal: from/to explícitos, o rolling de N días
fn resolve_window(
    from: Option<&str>,
    to: Option<&str>,
    days: Option<i64>,
    default_days: i64,
) -> Result<(DateTime<Utc>, DateTime<Utc>), AppError> {
    if let (Some(from), Some(to)) = (from, to) {
        let from = parse_datetime("from", from)?;
        let to = parse_datetime("to", to)?;
        if from > to {
            return Err(AppError::Validation(
                "'from' must not be after 'to'".to_string(),
            ));
        }
        return Ok((from, to));
    }

    let days = days.unwrap_or(default_days);
    if days <= 0 {
        return Err(AppError::Validation(
            "days must be greater than zero".to_string(),
        ));
    }
    let to = Utc::now();
    Ok((to - Duration::days(days), to))
}

/// ¿La eficiencia de este registro se derivó de distancia?
fn is_distance_derived(record: &FuelRecord) -> bool {
    record
        .distance_since_last
        .map_or(false, |d| d > Decimal::ZERO)
}

pub struct AnalyticsController {
    records: FuelRecordRepository,
}

impl AnalyticsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            records: FuelRecordRepository::new(pool),
        }
    }

    pub async fn get_fuel_efficiency(
        &self,
        caller: &AuthenticatedUser,
        query: AnalyticsWindowQuery,
    ) -> Result<FuelEfficiencyResponse, AppError> {
        require_permission(caller.role, Permission::ReportsRead)?;

        let (from, to) = resolve_window(
            query.from.as_deref(),
            query.to.as_deref(),
            query.days,
            DEFAULT_WINDOW_DAYS,
        )?;

        let records = self
            .records
            .find_in_window(caller.company_id, from, to, query.asset_id, ANALYTICS_ROW_CAP)
            .await?;

        let mut total_quantity = Decimal::ZERO;
        let mut total_cost = Decimal::ZERO;

        // Dos medias independientes: eficiencias derivadas de distancia y
        // derivadas de horas. Las poblaciones nunca se mezclan.
        let mut distance_values: Vec<Decimal> = Vec::new();
        let mut time_values: Vec<Decimal> = Vec::new();

        for record in &records {
            total_quantity += record.quantity;
            total_cost += record.total_cost;

            if let Some(efficiency) = record.fuel_efficiency {
                if is_distance_derived(record) {
                    distance_values.push(efficiency);
                } else {
                    time_values.push(efficiency);
                }
            }
        }

        Ok(FuelEfficiencyResponse {
            window_from: from.to_rfc3339(),
            window_to: to.to_rfc3339(),
            total_quantity: total_quantity.to_string(),
            total_cost: total_cost.to_string(),
            record_count: records.len(),
            distance_based: EfficiencyMean {
                mean: anomaly::mean(&distance_values).map(|m| m.round_dp(4).to_string()),
                record_count: distance_values.len(),
            },
            time_based: EfficiencyMean {
                mean: anomaly::mean(&time_values).map(|m| m.round_dp(4).to_string()),
                record_count: time_values.len(),
            },
        })
    }

    pub async fn get_consumption_report(
        &self,
        caller: &AuthenticatedUser,
        query: ConsumptionReportQuery,
    ) -> Result<ConsumptionReportResponse, AppError> {
        require_permission(caller.role, Permission::ReportsRead)?;

        let group_by = GroupBy::parse(query.group_by.as_deref())?;
        let (from, to) = resolve_window(
            query.from.as_deref(),
            query.to.as_deref(),
            query.days,
            DEFAULT_WINDOW_DAYS,
        )?;

        let records = self
            .records
            .find_in_window(caller.company_id, from, to, query.asset_id, ANALYTICS_ROW_CAP)
            .await?;
        let truncated = records.len() as i64 == ANALYTICS_ROW_CAP;

        let mut groups: BTreeMap<String, (Decimal, Decimal, usize)> = BTreeMap::new();
        let mut grand_quantity = Decimal::ZERO;
        let mut grand_cost = Decimal::ZERO;
        let record_count = records.len();

        for record in records {
            let key = match group_by {
                GroupBy::Asset => record.asset_id.to_string(),
                GroupBy::Site => record.site.clone().unwrap_or_else(|| "unknown".to_string()),
                GroupBy::FuelType => record.fuel_type.clone(),
            };
            let entry = groups
                .entry(key)
                .or_insert((Decimal::ZERO, Decimal::ZERO, 0));
            entry.0 += record.quantity;
            entry.1 += record.total_cost;
            entry.2 += 1;

            grand_quantity += record.quantity;
            grand_cost += record.total_cost;
        }

        Ok(ConsumptionReportResponse {
            group_by: group_by.as_str().to_string(),
            window_from: from.to_rfc3339(),
            window_to: to.to_rfc3339(),
            groups: groups
                .into_iter()
                .map(|(key, (quantity, cost, count))| ConsumptionGroup {
                    key,
                    total_quantity: quantity.to_string(),
                    total_cost: cost.to_string(),
                    record_count: count,
                })
                .collect(),
            grand_total_quantity: grand_quantity.to_string(),
            grand_total_cost: grand_cost.to_string(),
            grand_total_records: record_count,
            truncated,
        })
    }

    pub async fn detect_anomalies(
        &self,
        caller: &AuthenticatedUser,
        query: AnalyticsWindowQuery,
    ) -> Result<AnomalyReportResponse, AppError> {
        require_permission(caller.role, Permission::ReportsRead)?;

        let (from, to) = resolve_window(
            query.from.as_deref(),
            query.to.as_deref(),
            query.days,
            DEFAULT_ANOMALY_DAYS,
        )?;

        let records = self
            .records
            .find_in_window(caller.company_id, from, to, query.asset_id, ANALYTICS_ROW_CAP)
            .await?;

        // Agrupar por asset y calcular la media de eficiencias no nulas.
        // Un asset sin registros elegibles simplemente no produce anomalías.
        let mut by_asset: BTreeMap<Uuid, Vec<&FuelRecord>> = BTreeMap::new();
        for record in &records {
            by_asset.entry(record.asset_id).or_default().push(record);
        }

        let mut anomalies = Vec::new();
        for (asset_id, asset_records) in by_asset {
            let efficiencies: Vec<Decimal> = asset_records
                .iter()
                .filter_map(|r| r.fuel_efficiency)
                .collect();
            let Some(asset_mean) = anomaly::mean(&efficiencies) else {
                continue;
            };

            for record in asset_records {
                let Some(efficiency) = record.fuel_efficiency else {
                    continue;
                };
                if let Some(kind) = anomaly::classify(efficiency, asset_mean) {
                    anomalies.push(AnomalyResponse {
                        record_id: record.id.to_string(),
                        asset_id: asset_id.to_string(),
                        transaction_date: record.transaction_date.to_rfc3339(),
                        fuel_efficiency: efficiency.to_string(),
                        asset_mean_efficiency: asset_mean.round_dp(4).to_string(),
                        anomaly_type: kind,
                    });
                }
            }
        }

        Ok(AnomalyReportResponse {
            window_from: from.to_rfc3339(),
            window_to: to.to_rfc3339(),
            anomalies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_by_defaults_to_asset() {
        assert_eq!(GroupBy::parse(None).unwrap(), GroupBy::Asset);
        assert_eq!(GroupBy::parse(Some("site")).unwrap(), GroupBy::Site);
        assert!(GroupBy::parse(Some("driver")).is_err());
    }

    #[test]
    fn test_resolve_window_explicit_bounds() {
        let (from, to) = resolve_window(
            Some("2025-05-01T00:00:00Z"),
            Some("2025-05-31T23:59:59Z"),
            None,
            30,
        )
        .unwrap();
        assert!(from < to);
    }

    #[test]
    fn test_resolve_window_rejects_inverted_bounds() {
        let result = resolve_window(
            Some("2025-06-01T00:00:00Z"),
            Some("2025-05-01T00:00:00Z"),
            None,
            30,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_window_rolling_days() {
        let (from, to) = resolve_window(None, None, Some(7), 30).unwrap();
        assert_eq!((to - from).num_days(), 7);
        assert!(resolve_window(None, None, Some(0), 30).is_err());
    }
}
