mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{middleware as axum_middleware, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::EnvironmentConfig;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("⛽ Fleet Fuel Ledger - API");
    info!("==========================");

    // Inicializar base de datos
    if let Ok(url) = std::env::var("DATABASE_URL") {
        info!("🗄️ Base de datos: {}", database::connection::mask_database_url(&url));
    }
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::default();
    if config.is_development() {
        info!("🔓 Modo desarrollo: CORS permisivo");
    }
    let port = config.port;
    let app_state = AppState::new(pool, config);

    let api_router = Router::new()
        .nest("/api/fuel", routes::fuel_routes::create_fuel_router())
        .nest("/api/tanks", routes::tank_routes::create_tank_router())
        .nest(
            "/api/analytics",
            routes::analytics_routes::create_analytics_router(),
        )
        .nest(
            "/api/breakdowns",
            routes::breakdown_routes::create_breakdown_router(),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            middleware::auth::auth_middleware,
        ));

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .merge(api_router)
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("⛽ Endpoints - Fuel:");
    info!("   POST /api/fuel - Registrar transacción de combustible");
    info!("   GET  /api/fuel/asset/:id - Historial por asset");
    info!("   POST /api/fuel/asset/:id/rebuild-readings - Reconstruir snapshot");
    info!("🛢️ Endpoints - Tanks:");
    info!("   POST /api/tanks - Crear tanque");
    info!("   PUT  /api/tanks/:id - Actualizar tanque");
    info!("   POST /api/tanks/:id/refill - Registrar refill");
    info!("   POST /api/tanks/:id/dispense - Registrar dispense");
    info!("   GET  /api/tanks/levels - Niveles de tanques");
    info!("   GET  /api/tanks/alerts - Tanques bajo nivel de reorden");
    info!("   GET  /api/tanks/:id/transactions - Ledger del tanque");
    info!("📊 Endpoints - Analytics:");
    info!("   GET  /api/analytics/efficiency - Resumen de eficiencia");
    info!("   GET  /api/analytics/consumption - Reporte de consumo");
    info!("   GET  /api/analytics/anomalies - Detección de anomalías");
    info!("🔧 Endpoints - Breakdowns:");
    info!("   POST /api/breakdowns - Reportar avería");
    info!("   GET  /api/breakdowns - Listar averías");
    info!("   PUT  /api/breakdowns/:id - Actualizar avería");
    info!("   POST /api/breakdowns/:id/assign - Asignar avería");
    info!("   POST /api/breakdowns/:id/resolve - Resolver avería");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-fuel",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
