//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod asset;
pub mod breakdown;
pub mod fuel_record;
pub mod fuel_tank;
pub mod maintenance;
