//! DTOs de transacciones de combustible
//!
//! Los campos numéricos cruzan la frontera como strings decimales y las
//! fechas como ISO-8601; el parseo a Decimal/DateTime ocurre en el
//! controller con errores de Validation explícitos.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::fuel_record::FuelRecord;

/// Request para registrar una transacción de combustible contra un asset
#[derive(Debug, Deserialize, Validate)]
pub struct RecordFuelTransactionRequest {
    pub asset_id: Uuid,

    /// Fecha ISO-8601 de la transacción
    pub transaction_date: String,

    /// purchase por defecto
    pub transaction_type: Option<String>,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: String,

    /// String decimal, p.ej. "45.50"
    pub quantity: String,

    /// String decimal, p.ej. "1.479"
    pub unit_price: String,

    pub odometer_reading: Option<String>,
    pub hours_reading: Option<String>,

    #[validate(length(max = 120))]
    pub site: Option<String>,
}

/// Response de un FuelRecord para la API
#[derive(Debug, Serialize)]
pub struct FuelRecordResponse {
    pub id: String,
    pub asset_id: String,
    pub transaction_date: String,
    pub transaction_type: String,
    pub fuel_type: String,
    pub quantity: String,
    pub unit_price: String,
    pub total_cost: String,
    pub odometer_reading: Option<String>,
    pub hours_reading: Option<String>,
    pub distance_since_last: Option<String>,
    pub hours_since_last: Option<String>,
    pub fuel_efficiency: Option<String>,
    pub site: Option<String>,
    pub submitted_by: String,
    pub created_at: String,
}

impl From<FuelRecord> for FuelRecordResponse {
    fn from(record: FuelRecord) -> Self {
        Self {
            id: record.id.to_string(),
            asset_id: record.asset_id.to_string(),
            transaction_date: record.transaction_date.to_rfc3339(),
            transaction_type: record.transaction_type,
            fuel_type: record.fuel_type,
            quantity: record.quantity.to_string(),
            unit_price: record.unit_price.to_string(),
            total_cost: record.total_cost.to_string(),
            odometer_reading: record.odometer_reading.map(|d| d.to_string()),
            hours_reading: record.hours_reading.map(|d| d.to_string()),
            distance_since_last: record.distance_since_last.map(|d| d.to_string()),
            hours_since_last: record.hours_since_last.map(|d| d.to_string()),
            fuel_efficiency: record.fuel_efficiency.map(|d| d.to_string()),
            site: record.site,
            submitted_by: record.submitted_by.to_string(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Response del snapshot reconstruido de lecturas de un asset
#[derive(Debug, Serialize)]
pub struct AssetReadingsResponse {
    pub asset_id: String,
    pub current_odometer: Option<String>,
    pub current_hours: Option<String>,
    pub readings_updated_at: Option<String>,
}
