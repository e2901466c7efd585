//! Servicios de dominio
//!
//! Cálculo puro separado de la orquestación de los controllers: métricas
//! derivadas, reconciliación de estado, máquina de estados de averías,
//! balances de tanque y clasificación de anomalías.

pub mod anomaly;
pub mod breakdown_fsm;
pub mod derived_metrics;
pub mod status_reconciler;
pub mod tank_ledger;
