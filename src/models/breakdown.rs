//! Modelo de BreakdownLog
//!
//! Reporte de avería de un asset con ciclo de vida explícito:
//! reported -> acknowledged -> diagnosing -> awaiting_parts -> in_repair
//! -> resolved -> closed. "Activa" = status fuera de {resolved, closed}.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del ciclo de vida de una avería
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownStatus {
    Reported,
    Acknowledged,
    Diagnosing,
    AwaitingParts,
    InRepair,
    Resolved,
    Closed,
}

impl BreakdownStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakdownStatus::Reported => "reported",
            BreakdownStatus::Acknowledged => "acknowledged",
            BreakdownStatus::Diagnosing => "diagnosing",
            BreakdownStatus::AwaitingParts => "awaiting_parts",
            BreakdownStatus::InRepair => "in_repair",
            BreakdownStatus::Resolved => "resolved",
            BreakdownStatus::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reported" => Some(BreakdownStatus::Reported),
            "acknowledged" => Some(BreakdownStatus::Acknowledged),
            "diagnosing" => Some(BreakdownStatus::Diagnosing),
            "awaiting_parts" => Some(BreakdownStatus::AwaitingParts),
            "in_repair" => Some(BreakdownStatus::InRepair),
            "resolved" => Some(BreakdownStatus::Resolved),
            "closed" => Some(BreakdownStatus::Closed),
            _ => None,
        }
    }

    /// Una avería en estos estados ya no cuenta como activa
    pub fn is_terminal(&self) -> bool {
        matches!(self, BreakdownStatus::Resolved | BreakdownStatus::Closed)
    }
}

/// Severidad reportada de la avería
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BreakdownSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakdownSeverity::Low => "low",
            BreakdownSeverity::Medium => "medium",
            BreakdownSeverity::High => "high",
            BreakdownSeverity::Critical => "critical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(BreakdownSeverity::Low),
            "medium" => Some(BreakdownSeverity::Medium),
            "high" => Some(BreakdownSeverity::High),
            "critical" => Some(BreakdownSeverity::Critical),
            _ => None,
        }
    }
}

/// BreakdownLog - mapea a la tabla breakdown_logs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BreakdownLog {
    pub id: Uuid,
    pub company_id: Uuid,
    pub asset_id: Uuid,
    pub status: String,
    pub severity: String,
    pub category: Option<String>,
    pub description: String,
    pub repair_cost: Option<Decimal>,
    pub downtime_hours: Option<Decimal>,
    pub reported_by: Uuid,
    pub assigned_to: Option<Uuid>,
    pub resolved_by: Option<Uuid>,
    pub reported_date: DateTime<Utc>,
    pub resolved_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl BreakdownLog {
    pub fn status_enum(&self) -> Option<BreakdownStatus> {
        BreakdownStatus::parse(&self.status)
    }
}
