//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! permisos y otras funcionalidades comunes.

pub mod errors;
pub mod permissions;
pub mod validation;
