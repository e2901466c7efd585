//! DTOs de averías de equipamiento

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::breakdown::BreakdownLog;

/// Request para reportar una avería
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBreakdownRequest {
    pub asset_id: Uuid,

    /// low | medium | high | critical
    pub severity: String,

    #[validate(length(max = 60))]
    pub category: Option<String>,

    #[validate(length(min = 3, max = 1000))]
    pub description: String,

    /// ISO-8601; now si se omite
    pub reported_date: Option<String>,
}

/// Request de patch general de una avería
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBreakdownRequest {
    /// Override opcional de estado, validado contra la tabla de transiciones
    pub status: Option<String>,
    pub severity: Option<String>,

    #[validate(length(max = 60))]
    pub category: Option<String>,

    #[validate(length(min = 3, max = 1000))]
    pub description: Option<String>,

    /// String decimal
    pub repair_cost: Option<String>,
    /// String decimal
    pub downtime_hours: Option<String>,
}

/// Request para asignar una avería a un técnico
#[derive(Debug, Deserialize, Validate)]
pub struct AssignBreakdownRequest {
    pub assigned_to: Uuid,

    /// acknowledged si se omite
    pub status: Option<String>,
}

/// Request para resolver una avería
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveBreakdownRequest {
    /// ISO-8601; now si se omite
    pub resolved_date: Option<String>,

    /// resolved si se omite
    pub status: Option<String>,

    pub repair_cost: Option<String>,
    pub downtime_hours: Option<String>,
}

/// Query de listado de averías
#[derive(Debug, Deserialize)]
pub struct BreakdownListQuery {
    pub asset_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// Response de avería; incluye el estado del asset ya reconciliado
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub id: String,
    pub asset_id: String,
    pub status: String,
    pub severity: String,
    pub category: Option<String>,
    pub description: String,
    pub repair_cost: Option<String>,
    pub downtime_hours: Option<String>,
    pub reported_by: String,
    pub assigned_to: Option<String>,
    pub resolved_by: Option<String>,
    pub reported_date: String,
    pub resolved_date: Option<String>,
    pub asset_status: String,
}

impl BreakdownResponse {
    pub fn from_log(log: BreakdownLog, asset_status: &str) -> Self {
        Self {
            id: log.id.to_string(),
            asset_id: log.asset_id.to_string(),
            status: log.status,
            severity: log.severity,
            category: log.category,
            description: log.description,
            repair_cost: log.repair_cost.map(|d| d.to_string()),
            downtime_hours: log.downtime_hours.map(|d| d.to_string()),
            reported_by: log.reported_by.to_string(),
            assigned_to: log.assigned_to.map(|id| id.to_string()),
            resolved_by: log.resolved_by.map(|id| id.to_string()),
            reported_date: log.reported_date.to_rfc3339(),
            resolved_date: log.resolved_date.map(|d| d.to_rfc3339()),
            asset_status: asset_status.to_string(),
        }
    }
}
