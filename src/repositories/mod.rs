//! Capa de acceso a datos
//!
//! Un repositorio por agregado. Las operaciones que participan en unidades
//! atómicas (ledger de tanques, mutaciones de averías + reconciler) exponen
//! variantes `_on` sobre una PgConnection explícita.

pub mod asset_repository;
pub mod breakdown_repository;
pub mod fuel_record_repository;
pub mod fuel_tank_repository;
