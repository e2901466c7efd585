//! Reconciliación de estado del asset
//!
//! Recalcula el estado operacional de un asset puramente a partir de las
//! señales actuales (averías activas y mantenimientos abiertos), sin memoria
//! del estado anterior. Idempotente: con las mismas señales produce siempre
//! el mismo resultado. Se invoca tras cada transición de avería.

use sqlx::PgConnection;
use uuid::Uuid;

use crate::models::asset::AssetStatus;
use crate::models::breakdown::BreakdownStatus;
use crate::models::maintenance::MaintenanceStatus;
use crate::utils::errors::AppError;

/// Decisión pura de reconciliación. Orden de prioridad, gana el primero:
/// 1. Estado terminal (decommissioned/sold) -> no se toca (None).
/// 2. Averías activas -> breakdown.
/// 3. Mantenimientos abiertos -> in_maintenance.
/// 4. Si no -> active.
pub fn resolve_status(
    current: AssetStatus,
    open_breakdowns: i64,
    open_maintenance: i64,
) -> Option<AssetStatus> {
    if current.is_terminal() {
        return None;
    }
    if open_breakdowns > 0 {
        Some(AssetStatus::Breakdown)
    } else if open_maintenance > 0 {
        Some(AssetStatus::InMaintenance)
    } else {
        Some(AssetStatus::Active)
    }
}

/// Releer señales y escribir el estado reconciliado del asset.
///
/// Corre sobre la misma conexión/transacción que la mutación de avería que
/// lo dispara, para que el estado observado nunca se quede por detrás del
/// commit que lo causó.
pub async fn refresh_asset_status(
    conn: &mut PgConnection,
    asset_id: Uuid,
) -> Result<AssetStatus, AppError> {
    let current_status: (String,) = sqlx::query_as("SELECT status FROM assets WHERE id = $1")
        .bind(asset_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Asset with id '{}' not found", asset_id)))?;

    let current = AssetStatus::parse(&current_status.0)
        .ok_or_else(|| AppError::Internal(format!("Unknown asset status '{}'", current_status.0)))?;

    let open_breakdowns: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM breakdown_logs WHERE asset_id = $1 AND status NOT IN ($2, $3)",
    )
    .bind(asset_id)
    .bind(BreakdownStatus::Resolved.as_str())
    .bind(BreakdownStatus::Closed.as_str())
    .fetch_one(&mut *conn)
    .await?;

    let open_maintenance: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM maintenance_records WHERE asset_id = $1 AND status IN ($2, $3)",
    )
    .bind(asset_id)
    .bind(MaintenanceStatus::Scheduled.as_str())
    .bind(MaintenanceStatus::InProgress.as_str())
    .fetch_one(&mut *conn)
    .await?;

    let Some(next) = resolve_status(current, open_breakdowns.0, open_maintenance.0) else {
        return Ok(current);
    };

    if next != current {
        sqlx::query("UPDATE assets SET status = $2 WHERE id = $1")
            .bind(asset_id)
            .bind(next.as_str())
            .execute(&mut *conn)
            .await?;
        tracing::info!(
            "Asset {} status reconciled: {} -> {}",
            asset_id,
            current.as_str(),
            next.as_str()
        );
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_are_never_overwritten() {
        assert_eq!(resolve_status(AssetStatus::Decommissioned, 3, 2), None);
        assert_eq!(resolve_status(AssetStatus::Sold, 0, 0), None);
    }

    #[test]
    fn test_breakdown_wins_over_maintenance() {
        assert_eq!(
            resolve_status(AssetStatus::Active, 1, 5),
            Some(AssetStatus::Breakdown)
        );
    }

    #[test]
    fn test_open_maintenance_without_breakdowns() {
        assert_eq!(
            resolve_status(AssetStatus::Breakdown, 0, 1),
            Some(AssetStatus::InMaintenance)
        );
    }

    #[test]
    fn test_no_signals_reconciles_to_active() {
        assert_eq!(
            resolve_status(AssetStatus::Breakdown, 0, 0),
            Some(AssetStatus::Active)
        );
    }

    #[test]
    fn test_idempotent_given_unchanged_signals() {
        let first = resolve_status(AssetStatus::Active, 2, 0);
        let second = resolve_status(first.unwrap(), 2, 0);
        assert_eq!(first, second);
    }
}
