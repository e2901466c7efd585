//! Modelos de FuelTank y su ledger de transacciones
//!
//! Invariante del tanque: 0 <= current_level <= capacity en todo momento.
//! Cada fila del ledger lleva balance_before/balance_after y el
//! balance_before debe coincidir con el current_level del tanque en el
//! instante del commit (serializado con FOR UPDATE, ver TankController).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del tanque
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TankStatus {
    Active,
    Inactive,
}

impl TankStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TankStatus::Active => "active",
            TankStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(TankStatus::Active),
            "inactive" => Some(TankStatus::Inactive),
            _ => None,
        }
    }
}

/// Tipo de movimiento en el ledger del tanque
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TankTransactionType {
    Refill,
    Dispense,
    Adjustment,
}

impl TankTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TankTransactionType::Refill => "refill",
            TankTransactionType::Dispense => "dispense",
            TankTransactionType::Adjustment => "adjustment",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "refill" => Some(TankTransactionType::Refill),
            "dispense" => Some(TankTransactionType::Dispense),
            "adjustment" => Some(TankTransactionType::Adjustment),
            _ => None,
        }
    }
}

/// FuelTank - mapea a la tabla fuel_tanks
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelTank {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub fuel_type: String,
    pub capacity: Decimal,
    pub current_level: Decimal,
    pub reorder_level: Decimal,
    pub status: String,
    pub site: Option<String>,
    pub last_refill_date: Option<DateTime<Utc>>,
    pub last_refill_quantity: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// FuelTankTransaction - fila del ledger, mapea a fuel_tank_transactions
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FuelTankTransaction {
    pub id: Uuid,
    pub tank_id: Uuid,
    pub transaction_type: String,
    pub quantity: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub asset_id: Option<Uuid>,
    pub notes: Option<String>,
    pub performed_by: Uuid,
    pub transaction_date: DateTime<Utc>,
}
