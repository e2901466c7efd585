use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};

use crate::controllers::analytics_controller::AnalyticsController;
use crate::dto::analytics_dto::{
    AnalyticsWindowQuery, AnomalyReportResponse, ConsumptionReportQuery,
    ConsumptionReportResponse, FuelEfficiencyResponse,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/efficiency", get(get_fuel_efficiency))
        .route("/consumption", get(get_consumption_report))
        .route("/anomalies", get(detect_anomalies))
}

async fn get_fuel_efficiency(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<AnalyticsWindowQuery>,
) -> Result<Json<FuelEfficiencyResponse>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.get_fuel_efficiency(&user, query).await?;
    Ok(Json(response))
}

async fn get_consumption_report(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<ConsumptionReportQuery>,
) -> Result<Json<ConsumptionReportResponse>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.get_consumption_report(&user, query).await?;
    Ok(Json(response))
}

async fn detect_anomalies(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<AnalyticsWindowQuery>,
) -> Result<Json<AnomalyReportResponse>, AppError> {
    let controller = AnalyticsController::new(state.pool.clone());
    let response = controller.detect_anomalies(&user, query).await?;
    Ok(Json(response))
}
