//! Modelo de MaintenanceRecord (colaborador externo, solo lectura)
//!
//! Este core solo consulta el status de los registros de mantenimiento
//! para la reconciliación de estado del asset. La gestión de mantenimientos
//! vive en otro módulo del sistema.

use serde::{Deserialize, Serialize};

/// Estado de un registro de mantenimiento
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "scheduled",
            MaintenanceStatus::InProgress => "in_progress",
            MaintenanceStatus::Completed => "completed",
            MaintenanceStatus::Cancelled => "cancelled",
        }
    }
}
