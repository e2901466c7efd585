//! Modelo de Asset
//!
//! Este módulo contiene el struct Asset (vehículos y maquinaria de la flota)
//! y los enums de estado y tipo de combustible. Mapea a la tabla assets.
//!
//! `status`, `current_odometer` y `current_hours` son campos derivados/cache:
//! la fuente de verdad es el ledger de fuel_records y las señales de
//! breakdown/maintenance.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado operacional del asset (valor cacheado, recalculado por el reconciler)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Active,
    InMaintenance,
    Breakdown,
    Decommissioned,
    Sold,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "active",
            AssetStatus::InMaintenance => "in_maintenance",
            AssetStatus::Breakdown => "breakdown",
            AssetStatus::Decommissioned => "decommissioned",
            AssetStatus::Sold => "sold",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(AssetStatus::Active),
            "in_maintenance" => Some(AssetStatus::InMaintenance),
            "breakdown" => Some(AssetStatus::Breakdown),
            "decommissioned" => Some(AssetStatus::Decommissioned),
            "sold" => Some(AssetStatus::Sold),
            _ => None,
        }
    }

    /// Estados terminales: el reconciler nunca los sobreescribe
    pub fn is_terminal(&self) -> bool {
        matches!(self, AssetStatus::Decommissioned | AssetStatus::Sold)
    }
}

/// Tipo de combustible configurado para un asset o tanque
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Diesel,
    Gasoline,
    Lpg,
    None,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Diesel => "diesel",
            FuelType::Gasoline => "gasoline",
            FuelType::Lpg => "lpg",
            FuelType::None => "none",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "diesel" => Some(FuelType::Diesel),
            "gasoline" => Some(FuelType::Gasoline),
            "lpg" => Some(FuelType::Lpg),
            "none" => Some(FuelType::None),
            _ => None,
        }
    }
}

/// Asset principal - mapea a la tabla assets
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asset {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub asset_code: String,
    pub status: String,
    pub fuel_type: String,
    pub current_odometer: Option<Decimal>,
    pub current_hours: Option<Decimal>,
    pub readings_updated_at: Option<DateTime<Utc>>,
    pub site: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Asset {
    pub fn fuel_type_enum(&self) -> Option<FuelType> {
        FuelType::parse(&self.fuel_type)
    }
}
