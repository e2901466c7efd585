//! DTOs de la API
//!
//! Requests con validación declarativa y responses serializables. Todos los
//! decimales viajan como strings para mantener la aritmética exacta.

pub mod analytics_dto;
pub mod breakdown_dto;
pub mod common;
pub mod fuel_dto;
pub mod tank_dto;
