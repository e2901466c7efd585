//! Controller de transacciones de combustible
//!
//! Registra compras de combustible contra un asset. Orden de precondiciones:
//! asset existe, el asset consume combustible, el fuel type coincide, los
//! decimales parsean, y las lecturas no retroceden respecto al snapshot
//! cacheado. El insert en el ledger es la fuente de verdad; la actualización
//! del snapshot del asset es best-effort y reconstruible (rebuild_readings).

use sqlx::PgPool;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::fuel_dto::{
    AssetReadingsResponse, FuelRecordResponse, RecordFuelTransactionRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::asset::{Asset, FuelType};
use crate::models::fuel_record::FuelTransactionType;
use crate::repositories::asset_repository::AssetRepository;
use crate::repositories::fuel_record_repository::{FuelRecordRepository, NewFuelRecord};
use crate::services::derived_metrics;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::permissions::{require_permission, Permission};
use crate::utils::validation::{
    check_monotonic_reading, parse_datetime, parse_non_negative_decimal, parse_optional_decimal,
    parse_positive_decimal,
};
use uuid::Uuid;

/// Página máxima del historial por asset
const RECORD_PAGE_MAX: i64 = 100;

pub struct FuelController {
    assets: AssetRepository,
    records: FuelRecordRepository,
}

impl FuelController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            assets: AssetRepository::new(pool.clone()),
            records: FuelRecordRepository::new(pool),
        }
    }

    async fn find_owned_asset(
        &self,
        caller: &AuthenticatedUser,
        asset_id: Uuid,
    ) -> Result<Asset, AppError> {
        let asset = self
            .assets
            .find_by_id(asset_id)
            .await?
            .ok_or_else(|| not_found_error("Asset", &asset_id.to_string()))?;

        if asset.company_id != caller.company_id {
            return Err(AppError::Forbidden(
                "Asset does not belong to this company".to_string(),
            ));
        }

        Ok(asset)
    }

    pub async fn record_fuel_transaction(
        &self,
        caller: &AuthenticatedUser,
        request: RecordFuelTransactionRequest,
    ) -> Result<ApiResponse<FuelRecordResponse>, AppError> {
        require_permission(caller.role, Permission::FuelWrite)?;
        request.validate()?;

        // 1. El asset debe existir
        let asset = self.find_owned_asset(caller, request.asset_id).await?;

        // 2. El asset debe consumir combustible
        let asset_fuel = asset.fuel_type_enum().ok_or_else(|| {
            AppError::Internal(format!("Unknown asset fuel type '{}'", asset.fuel_type))
        })?;
        if asset_fuel == FuelType::None {
            return Err(AppError::Validation(
                "Asset is not configured to consume fuel".to_string(),
            ));
        }

        // 3. El fuel type del registro debe coincidir con el del asset
        let record_fuel = FuelType::parse(&request.fuel_type).ok_or_else(|| {
            AppError::Validation(format!("Unknown fuel type '{}'", request.fuel_type))
        })?;
        if record_fuel != asset_fuel {
            return Err(AppError::Validation(format!(
                "Fuel type '{}' does not match asset fuel type '{}'",
                request.fuel_type, asset.fuel_type
            )));
        }

        // 4. Los numéricos deben parsear a decimales finitos
        let quantity = parse_positive_decimal("quantity", &request.quantity)?;
        let unit_price = parse_non_negative_decimal("unit_price", &request.unit_price)?;
        let odometer_reading =
            parse_optional_decimal("odometer_reading", request.odometer_reading.as_deref())?;
        let hours_reading =
            parse_optional_decimal("hours_reading", request.hours_reading.as_deref())?;
        let transaction_date = parse_datetime("transaction_date", &request.transaction_date)?;

        let transaction_type = match request.transaction_type.as_deref() {
            Some(value) => FuelTransactionType::parse(value).ok_or_else(|| {
                AppError::Validation(format!("Unknown transaction type '{}'", value))
            })?,
            None => FuelTransactionType::Purchase,
        };

        // 5. Las lecturas no pueden retroceder respecto al snapshot cacheado
        check_monotonic_reading("Odometer", odometer_reading, asset.current_odometer)?;
        check_monotonic_reading("Hours", hours_reading, asset.current_hours)?;

        // total_cost siempre derivado, multiplicación decimal exacta
        let total_cost = quantity * unit_price;

        let previous = self
            .records
            .find_latest_before(asset.id, transaction_date)
            .await?;
        let metrics =
            derived_metrics::compute(quantity, odometer_reading, hours_reading, previous.as_ref());

        let record = self
            .records
            .insert(NewFuelRecord {
                company_id: caller.company_id,
                asset_id: asset.id,
                transaction_date,
                transaction_type: transaction_type.as_str().to_string(),
                fuel_type: request.fuel_type,
                quantity,
                unit_price,
                total_cost,
                odometer_reading,
                hours_reading,
                distance_since_last: metrics.distance_since_last,
                hours_since_last: metrics.hours_since_last,
                fuel_efficiency: metrics.fuel_efficiency,
                site: request.site,
                submitted_by: caller.user_id,
            })
            .await?;

        // Snapshot cacheado: write best-effort, no atómico con el insert del
        // ledger. Si falla, el cache queda stale pero el ledger ya es la
        // fuente de verdad y el snapshot se puede reconstruir.
        if odometer_reading.is_some() || hours_reading.is_some() {
            if let Err(e) = self
                .assets
                .update_cached_readings(asset.id, odometer_reading, hours_reading)
                .await
            {
                tracing::warn!(
                    "Cached readings update failed for asset {} (ledger row {} committed): {}",
                    asset.id,
                    record.id,
                    e
                );
            }
        }

        Ok(ApiResponse::success_with_message(
            record.into(),
            "Fuel transaction recorded successfully".to_string(),
        ))
    }

    pub async fn list_records(
        &self,
        caller: &AuthenticatedUser,
        asset_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<FuelRecordResponse>, AppError> {
        require_permission(caller.role, Permission::ReportsRead)?;

        let asset = self.find_owned_asset(caller, asset_id).await?;
        let limit = limit.unwrap_or(50).clamp(1, RECORD_PAGE_MAX);

        let records = self.records.list_for_asset(asset.id, limit).await?;
        Ok(records.into_iter().map(FuelRecordResponse::from).collect())
    }

    /// Operación de replay: reconstruir el snapshot cacheado de lecturas
    /// desde el ledger (recuperación de un cache stale).
    pub async fn rebuild_readings(
        &self,
        caller: &AuthenticatedUser,
        asset_id: Uuid,
    ) -> Result<ApiResponse<AssetReadingsResponse>, AppError> {
        require_permission(caller.role, Permission::FleetManage)?;

        self.find_owned_asset(caller, asset_id).await?;
        let asset = self.assets.rebuild_cached_readings(asset_id).await?;

        Ok(ApiResponse::success_with_message(
            AssetReadingsResponse {
                asset_id: asset.id.to_string(),
                current_odometer: asset.current_odometer.map(|d| d.to_string()),
                current_hours: asset.current_hours.map(|d| d.to_string()),
                readings_updated_at: asset.readings_updated_at.map(|d| d.to_rfc3339()),
            },
            "Asset readings rebuilt from fuel ledger".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    #[test]
    fn test_total_cost_is_exact_decimal_product() {
        let quantity = Decimal::from_str_exact("45.5").unwrap();
        let unit_price = Decimal::from_str_exact("1.479").unwrap();
        let total = quantity * unit_price;
        assert_eq!(total.to_string(), "67.2945");
    }
}
