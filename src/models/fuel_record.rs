//! Modelo de FuelRecord
//!
//! Registro inmutable de una transacción de combustible contra un asset.
//! No existe path de update: el ledger es append-only y es la fuente de
//! verdad para las lecturas cacheadas del asset.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de transacción de combustible
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FuelTransactionType {
    Purchase,
    TankDispense,
}

impl FuelTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelTransactionType::Purchase => "purchase",
            FuelTransactionType::TankDispense => "tank_dispense",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "purchase" => Some(FuelTransactionType::Purchase),
            "tank_dispense" => Some(FuelTransactionType::TankDispense),
            _ => None,
        }
    }
}

/// FuelRecord - mapea a la tabla fuel_records
///
/// `total_cost` siempre es derivado (quantity × unit_price, decimal exacto).
/// `distance_since_last`, `hours_since_last` y `fuel_efficiency` los calcula
/// el motor de métricas derivadas, nunca el caller.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelRecord {
    pub id: Uuid,
    pub company_id: Uuid,
    pub asset_id: Uuid,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: String,
    pub fuel_type: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_cost: Decimal,
    pub odometer_reading: Option<Decimal>,
    pub hours_reading: Option<Decimal>,
    pub distance_since_last: Option<Decimal>,
    pub hours_since_last: Option<Decimal>,
    pub fuel_efficiency: Option<Decimal>,
    pub site: Option<String>,
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
}
