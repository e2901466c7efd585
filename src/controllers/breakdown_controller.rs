//! Controller del ciclo de vida de averías
//!
//! Cada mutación (create/update/assign/resolve) corre en una transacción
//! junto con la reconciliación de estado del asset, de modo que el estado
//! observable nunca queda por detrás de la señal que lo causó. Los cambios
//! de estado pasan por la tabla de transiciones de breakdown_fsm.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::breakdown_dto::{
    AssignBreakdownRequest, BreakdownResponse, CreateBreakdownRequest, ResolveBreakdownRequest,
    UpdateBreakdownRequest,
};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::breakdown::{BreakdownLog, BreakdownSeverity, BreakdownStatus};
use crate::repositories::asset_repository::AssetRepository;
use crate::repositories::breakdown_repository::{
    BreakdownPatch, BreakdownRepository, NewBreakdown,
};
use crate::services::breakdown_fsm;
use crate::services::status_reconciler;
use crate::utils::errors::{not_found_error, AppError};
use crate::utils::permissions::{require_permission, Permission};
use crate::utils::validation::{parse_optional_datetime, parse_optional_decimal};

/// Página máxima del listado de averías
const BREAKDOWN_PAGE_MAX: i64 = 100;

pub struct BreakdownController {
    breakdowns: BreakdownRepository,
    pool: PgPool,
}

impl BreakdownController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            breakdowns: BreakdownRepository::new(pool.clone()),
            pool,
        }
    }

    fn current_status(log: &BreakdownLog) -> Result<BreakdownStatus, AppError> {
        log.status_enum()
            .ok_or_else(|| AppError::Internal(format!("Unknown breakdown status '{}'", log.status)))
    }

    fn parse_status(value: &str) -> Result<BreakdownStatus, AppError> {
        BreakdownStatus::parse(value)
            .ok_or_else(|| AppError::Validation(format!("Unknown breakdown status '{}'", value)))
    }

    fn check_company(log: &BreakdownLog, caller: &AuthenticatedUser) -> Result<(), AppError> {
        if log.company_id != caller.company_id {
            return Err(AppError::Forbidden(
                "Breakdown does not belong to this company".to_string(),
            ));
        }
        Ok(())
    }

    pub async fn create_breakdown(
        &self,
        caller: &AuthenticatedUser,
        request: CreateBreakdownRequest,
    ) -> Result<ApiResponse<BreakdownResponse>, AppError> {
        require_permission(caller.role, Permission::BreakdownWrite)?;
        request.validate()?;

        let severity = BreakdownSeverity::parse(&request.severity).ok_or_else(|| {
            AppError::Validation(format!("Unknown severity '{}'", request.severity))
        })?;
        let reported_date =
            parse_optional_datetime("reported_date", request.reported_date.as_deref())?
                .unwrap_or_else(Utc::now);

        let mut tx = self.pool.begin().await?;

        let asset = AssetRepository::find_by_id_on(&mut tx, request.asset_id)
            .await?
            .ok_or_else(|| not_found_error("Asset", &request.asset_id.to_string()))?;
        if asset.company_id != caller.company_id {
            return Err(AppError::Forbidden(
                "Asset does not belong to this company".to_string(),
            ));
        }

        let log = BreakdownRepository::insert_on(
            &mut tx,
            NewBreakdown {
                company_id: caller.company_id,
                asset_id: asset.id,
                severity: severity.as_str().to_string(),
                category: request.category,
                description: request.description,
                reported_by: caller.user_id,
                reported_date,
            },
        )
        .await?;

        let asset_status = status_reconciler::refresh_asset_status(&mut tx, asset.id).await?;
        tx.commit().await?;

        Ok(ApiResponse::success_with_message(
            BreakdownResponse::from_log(log, asset_status.as_str()),
            "Breakdown reported successfully".to_string(),
        ))
    }

    pub async fn update_breakdown(
        &self,
        caller: &AuthenticatedUser,
        breakdown_id: Uuid,
        request: UpdateBreakdownRequest,
    ) -> Result<ApiResponse<BreakdownResponse>, AppError> {
        require_permission(caller.role, Permission::BreakdownWrite)?;
        request.validate()?;

        let repair_cost = parse_optional_decimal("repair_cost", request.repair_cost.as_deref())?;
        let downtime_hours =
            parse_optional_decimal("downtime_hours", request.downtime_hours.as_deref())?;

        let severity = match request.severity.as_deref() {
            Some(value) => Some(
                BreakdownSeverity::parse(value)
                    .ok_or_else(|| AppError::Validation(format!("Unknown severity '{}'", value)))?
                    .as_str()
                    .to_string(),
            ),
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let log = BreakdownRepository::find_by_id_on(&mut tx, breakdown_id)
            .await?
            .ok_or_else(|| not_found_error("Breakdown", &breakdown_id.to_string()))?;
        Self::check_company(&log, caller)?;

        let status = match request.status.as_deref() {
            Some(value) => {
                let target = Self::parse_status(value)?;
                breakdown_fsm::validate_transition(Self::current_status(&log)?, target)?;
                Some(target.as_str().to_string())
            }
            None => None,
        };

        let updated = BreakdownRepository::apply_patch_on(
            &mut tx,
            log.id,
            BreakdownPatch {
                status,
                severity,
                category: request.category,
                description: request.description,
                repair_cost,
                downtime_hours,
                ..Default::default()
            },
        )
        .await?;

        let asset_status =
            status_reconciler::refresh_asset_status(&mut tx, updated.asset_id).await?;
        tx.commit().await?;

        Ok(ApiResponse::success_with_message(
            BreakdownResponse::from_log(updated, asset_status.as_str()),
            "Breakdown updated successfully".to_string(),
        ))
    }

    pub async fn assign_breakdown(
        &self,
        caller: &AuthenticatedUser,
        breakdown_id: Uuid,
        request: AssignBreakdownRequest,
    ) -> Result<ApiResponse<BreakdownResponse>, AppError> {
        require_permission(caller.role, Permission::BreakdownWrite)?;
        request.validate()?;

        let mut tx = self.pool.begin().await?;

        let log = BreakdownRepository::find_by_id_on(&mut tx, breakdown_id)
            .await?
            .ok_or_else(|| not_found_error("Breakdown", &breakdown_id.to_string()))?;
        Self::check_company(&log, caller)?;

        // sin override del caller, el destino por defecto no retrocede
        // una avería que ya pasó de acknowledged
        let current = Self::current_status(&log)?;
        let target = match request.status.as_deref() {
            Some(value) => Self::parse_status(value)?,
            None => breakdown_fsm::assignment_target(current),
        };
        breakdown_fsm::validate_transition(current, target)?;

        let updated = BreakdownRepository::apply_patch_on(
            &mut tx,
            log.id,
            BreakdownPatch {
                status: Some(target.as_str().to_string()),
                assigned_to: Some(request.assigned_to),
                ..Default::default()
            },
        )
        .await?;

        let asset_status =
            status_reconciler::refresh_asset_status(&mut tx, updated.asset_id).await?;
        tx.commit().await?;

        Ok(ApiResponse::success_with_message(
            BreakdownResponse::from_log(updated, asset_status.as_str()),
            "Breakdown assigned successfully".to_string(),
        ))
    }

    pub async fn resolve_breakdown(
        &self,
        caller: &AuthenticatedUser,
        breakdown_id: Uuid,
        request: ResolveBreakdownRequest,
    ) -> Result<ApiResponse<BreakdownResponse>, AppError> {
        require_permission(caller.role, Permission::BreakdownWrite)?;
        request.validate()?;

        let repair_cost = parse_optional_decimal("repair_cost", request.repair_cost.as_deref())?;
        let downtime_hours =
            parse_optional_decimal("downtime_hours", request.downtime_hours.as_deref())?;
        let resolved_date =
            parse_optional_datetime("resolved_date", request.resolved_date.as_deref())?
                .unwrap_or_else(Utc::now);

        let mut tx = self.pool.begin().await?;

        let log = BreakdownRepository::find_by_id_on(&mut tx, breakdown_id)
            .await?
            .ok_or_else(|| not_found_error("Breakdown", &breakdown_id.to_string()))?;
        Self::check_company(&log, caller)?;

        // resolved salvo override explícito del caller
        let target = match request.status.as_deref() {
            Some(value) => Self::parse_status(value)?,
            None => BreakdownStatus::Resolved,
        };
        breakdown_fsm::validate_transition(Self::current_status(&log)?, target)?;

        let updated = BreakdownRepository::apply_patch_on(
            &mut tx,
            log.id,
            BreakdownPatch {
                status: Some(target.as_str().to_string()),
                repair_cost,
                downtime_hours,
                resolved_by: Some(caller.user_id),
                resolved_date: Some(resolved_date),
                ..Default::default()
            },
        )
        .await?;

        let asset_status =
            status_reconciler::refresh_asset_status(&mut tx, updated.asset_id).await?;
        tx.commit().await?;

        Ok(ApiResponse::success_with_message(
            BreakdownResponse::from_log(updated, asset_status.as_str()),
            "Breakdown resolved successfully".to_string(),
        ))
    }

    pub async fn list_breakdowns(
        &self,
        caller: &AuthenticatedUser,
        asset_id: Option<Uuid>,
        limit: Option<i64>,
    ) -> Result<Vec<BreakdownResponse>, AppError> {
        require_permission(caller.role, Permission::ReportsRead)?;

        let limit = limit.unwrap_or(50).clamp(1, BREAKDOWN_PAGE_MAX);
        let logs = self
            .breakdowns
            .list_by_company(caller.company_id, asset_id, limit)
            .await?;

        // Para listados no se reconcilia nada: el status del asset mostrado
        // es el que dejó la última mutación
        Ok(logs
            .into_iter()
            .map(|row| BreakdownResponse::from_log(row.log, &row.asset_status))
            .collect())
    }
}
