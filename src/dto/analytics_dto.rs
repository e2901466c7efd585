//! DTOs de analytics de combustible
//!
//! Las tres operaciones son de solo lectura e idempotentes. Las ventanas
//! temporales llegan como from/to ISO-8601 explícitos o como días rolling.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ventana temporal de un query de analytics
#[derive(Debug, Deserialize)]
pub struct AnalyticsWindowQuery {
    /// ISO-8601; si falta, rolling de `days`
    pub from: Option<String>,
    pub to: Option<String>,
    pub days: Option<i64>,
    pub asset_id: Option<Uuid>,
}

/// Query del reporte de consumo
#[derive(Debug, Deserialize)]
pub struct ConsumptionReportQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    pub days: Option<i64>,
    pub asset_id: Option<Uuid>,
    /// asset | site | fuel_type (asset por defecto)
    pub group_by: Option<String>,
}

/// Media de una población de eficiencias. `mean` es null cuando no hay
/// registros contribuyentes, nunca cero.
#[derive(Debug, Serialize)]
pub struct EfficiencyMean {
    pub mean: Option<String>,
    pub record_count: usize,
}

/// Response del resumen de eficiencia
#[derive(Debug, Serialize)]
pub struct FuelEfficiencyResponse {
    pub window_from: String,
    pub window_to: String,
    pub total_quantity: String,
    pub total_cost: String,
    pub record_count: usize,
    /// Media sobre registros con eficiencia derivada de distancia
    pub distance_based: EfficiencyMean,
    /// Media sobre registros con eficiencia derivada de horas
    pub time_based: EfficiencyMean,
}

/// Grupo del reporte de consumo
#[derive(Debug, Serialize)]
pub struct ConsumptionGroup {
    pub key: String,
    pub total_quantity: String,
    pub total_cost: String,
    pub record_count: usize,
}

/// Response del reporte de consumo
#[derive(Debug, Serialize)]
pub struct ConsumptionReportResponse {
    pub group_by: String,
    pub window_from: String,
    pub window_to: String,
    pub groups: Vec<ConsumptionGroup>,
    pub grand_total_quantity: String,
    pub grand_total_cost: String,
    pub grand_total_records: usize,
    /// true si el reporte tocó el cap de filas y puede estar truncado
    pub truncated: bool,
}

/// Anomalía de consumo detectada
#[derive(Debug, Serialize)]
pub struct AnomalyResponse {
    pub record_id: String,
    pub asset_id: String,
    pub transaction_date: String,
    pub fuel_efficiency: String,
    pub asset_mean_efficiency: String,
    pub anomaly_type: crate::services::anomaly::AnomalyKind,
}

/// Response de la detección de anomalías
#[derive(Debug, Serialize)]
pub struct AnomalyReportResponse {
    pub window_from: String,
    pub window_to: String,
    pub anomalies: Vec<AnomalyResponse>,
}
