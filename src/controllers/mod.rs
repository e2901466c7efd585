//! Controllers del core
//!
//! Orquestación por componente: precondiciones, permisos, transacciones
//! y composición de repositorios + servicios puros.

pub mod analytics_controller;
pub mod breakdown_controller;
pub mod fuel_controller;
pub mod tank_controller;
