//! Permisos tipados por rol
//!
//! Tabla enumerada rol -> permisos que reemplaza los checks ad-hoc por
//! string de rol. Cada operación mutadora del core exige un permiso con
//! nombre; la autenticación en sí es responsabilidad del middleware.

use serde::{Deserialize, Serialize};

use crate::utils::errors::AppError;

/// Rol del usuario autenticado (viene del JWT)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    FleetManager,
    Operator,
    Viewer,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "admin" => Some(Role::Admin),
            "fleet_manager" => Some(Role::FleetManager),
            "operator" => Some(Role::Operator),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }
}

/// Capacidades concretas que exigen las operaciones del core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Registrar transacciones de combustible contra un asset
    FuelWrite,
    /// Operar tanques: refill, dispense, ajustes
    TankOperate,
    /// Crear/modificar tanques y reconstruir lecturas cacheadas
    FleetManage,
    /// Crear y gestionar averías
    BreakdownWrite,
    /// Consultar reportes y analytics
    ReportsRead,
}

impl Permission {
    fn label(&self) -> &'static str {
        match self {
            Permission::FuelWrite => "record fuel transactions",
            Permission::TankOperate => "operate fuel tanks",
            Permission::FleetManage => "manage fleet resources",
            Permission::BreakdownWrite => "manage breakdown reports",
            Permission::ReportsRead => "read fleet reports",
        }
    }
}

/// Tabla rol -> permiso
pub fn role_has_permission(role: Role, permission: Permission) -> bool {
    match role {
        Role::Admin => true,
        Role::FleetManager => true,
        Role::Operator => matches!(
            permission,
            Permission::FuelWrite
                | Permission::TankOperate
                | Permission::BreakdownWrite
                | Permission::ReportsRead
        ),
        Role::Viewer => matches!(permission, Permission::ReportsRead),
    }
}

/// Gate de precondición usado por los controllers
pub fn require_permission(role: Role, permission: Permission) -> Result<(), AppError> {
    if role_has_permission(role, permission) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Caller role does not allow to {}",
            permission.label()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_is_read_only() {
        assert!(require_permission(Role::Viewer, Permission::ReportsRead).is_ok());
        assert!(require_permission(Role::Viewer, Permission::FuelWrite).is_err());
        assert!(require_permission(Role::Viewer, Permission::TankOperate).is_err());
    }

    #[test]
    fn test_operator_cannot_manage_fleet() {
        assert!(require_permission(Role::Operator, Permission::TankOperate).is_ok());
        assert!(require_permission(Role::Operator, Permission::FleetManage).is_err());
    }

    #[test]
    fn test_admin_has_everything() {
        assert!(require_permission(Role::Admin, Permission::FleetManage).is_ok());
        assert!(require_permission(Role::Admin, Permission::BreakdownWrite).is_ok());
    }
}
