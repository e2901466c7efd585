//! Controller del ledger de tanques de combustible
//!
//! Refill y dispense corren como una sola transacción SQL: lectura del
//! tanque con FOR UPDATE, check de balance, insert de la fila del ledger,
//! update del nivel y, en dispense dirigido a asset, el FuelRecord en
//! cascada. Dos dispenses concurrentes contra el mismo tanque nunca
//! validan contra un current_level stale. Cualquier fallo dentro de la
//! unidad revierte todo: un ledger parcial no es un estado observable.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::tank_dto::{
    CreateTankRequest, FuelTankResponse, TankDispenseRequest, TankRefillRequest,
    TankTransactionResponse, UpdateTankRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::asset::FuelType;
use crate::models::fuel_record::FuelTransactionType;
use crate::models::fuel_tank::{FuelTank, TankStatus, TankTransactionType};
use crate::repositories::asset_repository::AssetRepository;
use crate::repositories::fuel_record_repository::{FuelRecordRepository, NewFuelRecord};
use crate::repositories::fuel_tank_repository::{FuelTankRepository, NewTankTransaction};
use crate::services::{derived_metrics, tank_ledger};
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::permissions::{require_permission, Permission};
use crate::utils::validation::{
    parse_non_negative_decimal, parse_optional_decimal, parse_positive_decimal,
};

/// Página máxima del ledger de un tanque
const TRANSACTION_PAGE_MAX: i64 = 100;

pub struct TankController {
    tanks: FuelTankRepository,
    pool: PgPool,
}

impl TankController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tanks: FuelTankRepository::new(pool.clone()),
            pool,
        }
    }

    fn check_company(tank: &FuelTank, caller: &AuthenticatedUser) -> Result<(), AppError> {
        if tank.company_id != caller.company_id {
            return Err(AppError::Forbidden(
                "Fuel tank does not belong to this company".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create_tank(
        &self,
        caller: &AuthenticatedUser,
        request: CreateTankRequest,
    ) -> Result<ApiResponse<FuelTankResponse>, AppError> {
        require_permission(caller.role, Permission::FleetManage)?;
        request.validate()?;

        let fuel_type = FuelType::parse(&request.fuel_type).ok_or_else(|| {
            AppError::Validation(format!("Unknown fuel type '{}'", request.fuel_type))
        })?;
        if fuel_type == FuelType::None {
            return Err(AppError::Validation(
                "A fuel tank must hold an actual fuel type".to_string(),
            ));
        }

        let capacity = parse_positive_decimal("capacity", &request.capacity)?;
        let reorder_level = parse_non_negative_decimal("reorder_level", &request.reorder_level)?;
        let current_level = match request.current_level.as_deref() {
            Some(value) => parse_non_negative_decimal("current_level", value)?,
            None => Decimal::ZERO,
        };

        if current_level > capacity {
            return Err(AppError::Validation(
                "Current level cannot exceed tank capacity".to_string(),
            ));
        }

        let tank = self
            .tanks
            .create(
                caller.company_id,
                request.name,
                fuel_type.as_str().to_string(),
                capacity,
                current_level,
                reorder_level,
                request.site,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            tank.into(),
            "Fuel tank created successfully".to_string(),
        ))
    }

    pub async fn update_tank(
        &self,
        caller: &AuthenticatedUser,
        tank_id: Uuid,
        request: UpdateTankRequest,
    ) -> Result<ApiResponse<FuelTankResponse>, AppError> {
        require_permission(caller.role, Permission::FleetManage)?;
        request.validate()?;

        let tank = self
            .tanks
            .find_by_id(tank_id)
            .await?
            .ok_or_else(|| not_found_error("Fuel tank", &tank_id.to_string()))?;
        Self::check_company(&tank, caller)?;

        let capacity = parse_optional_decimal("capacity", request.capacity.as_deref())?;
        let reorder_level =
            parse_optional_decimal("reorder_level", request.reorder_level.as_deref())?;

        if let Some(new_capacity) = capacity {
            if new_capacity <= Decimal::ZERO {
                return Err(AppError::Validation(
                    "capacity must be greater than zero".to_string(),
                ));
            }
            if tank.current_level > new_capacity {
                return Err(AppError::Validation(
                    "Current level cannot exceed tank capacity".to_string(),
                ));
            }
        }

        let status = match request.status.as_deref() {
            Some(value) => Some(
                TankStatus::parse(value)
                    .ok_or_else(|| {
                        AppError::Validation(format!("Unknown tank status '{}'", value))
                    })?
                    .as_str()
                    .to_string(),
            ),
            None => None,
        };

        let updated = self
            .tanks
            .update(tank.id, request.name, capacity, reorder_level, status, request.site)
            .await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Fuel tank updated successfully".to_string(),
        ))
    }

    pub async fn record_refill(
        &self,
        caller: &AuthenticatedUser,
        tank_id: Uuid,
        request: TankRefillRequest,
    ) -> Result<ApiResponse<TankTransactionResponse>, AppError> {
        require_permission(caller.role, Permission::TankOperate)?;
        request.validate()?;

        let quantity = parse_positive_decimal("quantity", &request.quantity)?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let tank = FuelTankRepository::find_by_id_for_update(&mut tx, tank_id)
            .await?
            .ok_or_else(|| not_found_error("Fuel tank", &tank_id.to_string()))?;
        Self::check_company(&tank, caller)?;

        let balance_before = tank.current_level;
        let balance_after = tank_ledger::refill_balance(balance_before, tank.capacity, quantity)?;

        let ledger_row = FuelTankRepository::insert_transaction_on(
            &mut tx,
            NewTankTransaction {
                tank_id: tank.id,
                transaction_type: TankTransactionType::Refill.as_str().to_string(),
                quantity,
                balance_before,
                balance_after,
                asset_id: None,
                notes: request.notes,
                performed_by: caller.user_id,
                transaction_date: now,
            },
        )
        .await?;

        FuelTankRepository::apply_refill_on(&mut tx, tank.id, balance_after, quantity, now).await?;

        tx.commit().await?;

        Ok(ApiResponse::success_with_message(
            ledger_row.into(),
            "Tank refill recorded successfully".to_string(),
        ))
    }

    pub async fn record_dispense(
        &self,
        caller: &AuthenticatedUser,
        tank_id: Uuid,
        request: TankDispenseRequest,
    ) -> Result<ApiResponse<TankTransactionResponse>, AppError> {
        require_permission(caller.role, Permission::TankOperate)?;
        request.validate()?;

        let quantity = parse_positive_decimal("quantity", &request.quantity)?;
        let unit_price = match request.unit_price.as_deref() {
            Some(value) => parse_non_negative_decimal("unit_price", value)?,
            None => Decimal::ZERO,
        };
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        let tank = FuelTankRepository::find_by_id_for_update(&mut tx, tank_id)
            .await?
            .ok_or_else(|| not_found_error("Fuel tank", &tank_id.to_string()))?;
        Self::check_company(&tank, caller)?;

        let balance_before = tank.current_level;
        let balance_after = tank_ledger::dispense_balance(balance_before, quantity)?;

        // Dispense dirigido a asset: el asset debe existir y su fuel type
        // debe coincidir con el del tanque
        if let Some(asset_id) = request.asset_id {
            let asset = AssetRepository::find_by_id_on(&mut tx, asset_id)
                .await?
                .ok_or_else(|| not_found_error("Asset", &asset_id.to_string()))?;
            if asset.company_id != caller.company_id {
                return Err(AppError::Forbidden(
                    "Asset does not belong to this company".to_string(),
                ));
            }
            if asset.fuel_type != tank.fuel_type {
                return Err(AppError::Validation(format!(
                    "Asset fuel type '{}' does not match tank fuel type '{}'",
                    asset.fuel_type, tank.fuel_type
                )));
            }
        }

        let ledger_row = FuelTankRepository::insert_transaction_on(
            &mut tx,
            NewTankTransaction {
                tank_id: tank.id,
                transaction_type: TankTransactionType::Dispense.as_str().to_string(),
                quantity,
                balance_before,
                balance_after,
                asset_id: request.asset_id,
                notes: request.notes,
                performed_by: caller.user_id,
                transaction_date: now,
            },
        )
        .await?;

        FuelTankRepository::apply_level_on(&mut tx, tank.id, balance_after).await?;

        // Cascada al ledger de combustible del asset. En este path no llegan
        // lecturas de odómetro/horas, así que el snapshot cacheado del asset
        // no se toca (a diferencia de una carga directa en surtidor).
        if let Some(asset_id) = request.asset_id {
            let previous =
                FuelRecordRepository::find_latest_before_on(&mut tx, asset_id, now).await?;
            let metrics = derived_metrics::compute(quantity, None, None, previous.as_ref());

            FuelRecordRepository::insert_on(
                &mut tx,
                NewFuelRecord {
                    company_id: caller.company_id,
                    asset_id,
                    transaction_date: now,
                    transaction_type: FuelTransactionType::TankDispense.as_str().to_string(),
                    fuel_type: tank.fuel_type.clone(),
                    quantity,
                    unit_price,
                    total_cost: quantity * unit_price,
                    odometer_reading: None,
                    hours_reading: None,
                    distance_since_last: metrics.distance_since_last,
                    hours_since_last: metrics.hours_since_last,
                    fuel_efficiency: metrics.fuel_efficiency,
                    site: tank.site.clone(),
                    submitted_by: caller.user_id,
                },
            )
            .await?;
        }

        tx.commit().await?;

        Ok(ApiResponse::success_with_message(
            ledger_row.into(),
            "Tank dispense recorded successfully".to_string(),
        ))
    }

    pub async fn get_tank_levels(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<FuelTankResponse>, AppError> {
        require_permission(caller.role, Permission::ReportsRead)?;

        let tanks = self.tanks.list_by_company(caller.company_id).await?;
        Ok(tanks.into_iter().map(FuelTankResponse::from).collect())
    }

    /// Tanques activos en o por debajo de su nivel de reorden
    pub async fn get_low_tank_alerts(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<Vec<FuelTankResponse>, AppError> {
        require_permission(caller.role, Permission::ReportsRead)?;

        let tanks = self.tanks.find_low_tanks(caller.company_id).await?;
        Ok(tanks.into_iter().map(FuelTankResponse::from).collect())
    }

    pub async fn get_tank_transactions(
        &self,
        caller: &AuthenticatedUser,
        tank_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<TankTransactionResponse>, AppError> {
        require_permission(caller.role, Permission::ReportsRead)?;

        let tank = self
            .tanks
            .find_by_id(tank_id)
            .await?
            .ok_or_else(|| not_found_error("Fuel tank", &tank_id.to_string()))?;
        Self::check_company(&tank, caller)?;

        let limit = limit.unwrap_or(50).clamp(1, TRANSACTION_PAGE_MAX);
        let transactions = self.tanks.list_transactions(tank.id, limit).await?;

        Ok(transactions
            .into_iter()
            .map(TankTransactionResponse::from)
            .collect())
    }
}
