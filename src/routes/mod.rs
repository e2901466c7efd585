//! Routers de la API
//!
//! Un router por recurso, estilo MVC: handler -> controller -> repositorio.

pub mod analytics_routes;
pub mod breakdown_routes;
pub mod fuel_routes;
pub mod tank_routes;
