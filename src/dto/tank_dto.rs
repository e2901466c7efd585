//! DTOs de tanques de combustible y su ledger

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::fuel_tank::{FuelTank, FuelTankTransaction};

/// Request para crear un tanque
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTankRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(length(min = 2, max = 20))]
    pub fuel_type: String,

    /// String decimal
    pub capacity: String,

    /// String decimal; 0 si se omite
    pub current_level: Option<String>,

    /// String decimal
    pub reorder_level: String,

    #[validate(length(max = 120))]
    pub site: Option<String>,
}

/// Request para actualizar un tanque. El nivel no se toca por aquí: solo
/// se mueve a través del ledger (refill/dispense/adjustment).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTankRequest {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,

    pub capacity: Option<String>,
    pub reorder_level: Option<String>,
    pub status: Option<String>,

    #[validate(length(max = 120))]
    pub site: Option<String>,
}

/// Request de refill de tanque
#[derive(Debug, Deserialize, Validate)]
pub struct TankRefillRequest {
    /// String decimal, estrictamente positivo
    pub quantity: String,

    #[validate(length(max = 250))]
    pub notes: Option<String>,
}

/// Request de dispense de tanque, opcionalmente dirigido a un asset
#[derive(Debug, Deserialize, Validate)]
pub struct TankDispenseRequest {
    /// String decimal, estrictamente positivo
    pub quantity: String,

    /// Si se indica, cascadea un FuelRecord tank_dispense para el asset
    pub asset_id: Option<Uuid>,

    /// String decimal; 0 si se omite (combustible ya pagado en el refill)
    pub unit_price: Option<String>,

    #[validate(length(max = 250))]
    pub notes: Option<String>,
}

/// Query de paginación del ledger del tanque
#[derive(Debug, Deserialize)]
pub struct TankTransactionsQuery {
    pub limit: Option<i64>,
}

/// Response de tanque para la API
#[derive(Debug, Serialize)]
pub struct FuelTankResponse {
    pub id: String,
    pub name: String,
    pub fuel_type: String,
    pub capacity: String,
    pub current_level: String,
    pub reorder_level: String,
    pub status: String,
    pub site: Option<String>,
    pub last_refill_date: Option<String>,
    pub last_refill_quantity: Option<String>,
    pub created_at: String,
}

impl From<FuelTank> for FuelTankResponse {
    fn from(tank: FuelTank) -> Self {
        Self {
            id: tank.id.to_string(),
            name: tank.name,
            fuel_type: tank.fuel_type,
            capacity: tank.capacity.to_string(),
            current_level: tank.current_level.to_string(),
            reorder_level: tank.reorder_level.to_string(),
            status: tank.status,
            site: tank.site,
            last_refill_date: tank.last_refill_date.map(|d| d.to_rfc3339()),
            last_refill_quantity: tank.last_refill_quantity.map(|d| d.to_string()),
            created_at: tank.created_at.to_rfc3339(),
        }
    }
}

/// Response de una fila del ledger del tanque
#[derive(Debug, Serialize)]
pub struct TankTransactionResponse {
    pub id: String,
    pub tank_id: String,
    pub transaction_type: String,
    pub quantity: String,
    pub balance_before: String,
    pub balance_after: String,
    pub asset_id: Option<String>,
    pub notes: Option<String>,
    pub performed_by: String,
    pub transaction_date: String,
}

impl From<FuelTankTransaction> for TankTransactionResponse {
    fn from(tx: FuelTankTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            tank_id: tx.tank_id.to_string(),
            transaction_type: tx.transaction_type,
            quantity: tx.quantity.to_string(),
            balance_before: tx.balance_before.to_string(),
            balance_after: tx.balance_after.to_string(),
            asset_id: tx.asset_id.map(|id| id.to_string()),
            notes: tx.notes,
            performed_by: tx.performed_by.to_string(),
            transaction_date: tx.transaction_date.to_rfc3339(),
        }
    }
}
