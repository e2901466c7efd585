use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controllers::fuel_controller::FuelController;
use crate::dto::common::ApiResponse;
use crate::dto::fuel_dto::{
    AssetReadingsResponse, FuelRecordResponse, RecordFuelTransactionRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_fuel_router() -> Router<AppState> {
    Router::new()
        .route("/", post(record_fuel_transaction))
        .route("/asset/:asset_id", get(list_asset_records))
        .route("/asset/:asset_id/rebuild-readings", post(rebuild_asset_readings))
}

#[derive(Debug, Deserialize)]
struct RecordListQuery {
    limit: Option<i64>,
}

async fn record_fuel_transaction(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<RecordFuelTransactionRequest>,
) -> Result<Json<ApiResponse<FuelRecordResponse>>, AppError> {
    let controller = FuelController::new(state.pool.clone());
    let response = controller.record_fuel_transaction(&user, request).await?;
    Ok(Json(response))
}

async fn list_asset_records(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(asset_id): Path<Uuid>,
    Query(query): Query<RecordListQuery>,
) -> Result<Json<Vec<FuelRecordResponse>>, AppError> {
    let controller = FuelController::new(state.pool.clone());
    let response = controller.list_records(&user, asset_id, query.limit).await?;
    Ok(Json(response))
}

async fn rebuild_asset_readings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(asset_id): Path<Uuid>,
) -> Result<Json<ApiResponse<AssetReadingsResponse>>, AppError> {
    let controller = FuelController::new(state.pool.clone());
    let response = controller.rebuild_readings(&user, asset_id).await?;
    Ok(Json(response))
}
