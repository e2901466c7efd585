use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::tank_controller::TankController;
use crate::dto::common::ApiResponse;
use crate::dto::tank_dto::{
    CreateTankRequest, FuelTankResponse, TankDispenseRequest, TankRefillRequest,
    TankTransactionResponse, TankTransactionsQuery, UpdateTankRequest,
};
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_tank_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_tank))
        .route("/levels", get(get_tank_levels))
        .route("/alerts", get(get_low_tank_alerts))
        .route("/:id", put(update_tank))
        .route("/:id/refill", post(record_refill))
        .route("/:id/dispense", post(record_dispense))
        .route("/:id/transactions", get(get_tank_transactions))
}

async fn create_tank(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateTankRequest>,
) -> Result<Json<ApiResponse<FuelTankResponse>>, AppError> {
    let controller = TankController::new(state.pool.clone());
    let response = controller.create_tank(&user, request).await?;
    Ok(Json(response))
}

async fn update_tank(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTankRequest>,
) -> Result<Json<ApiResponse<FuelTankResponse>>, AppError> {
    let controller = TankController::new(state.pool.clone());
    let response = controller.update_tank(&user, id, request).await?;
    Ok(Json(response))
}

async fn record_refill(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<TankRefillRequest>,
) -> Result<Json<ApiResponse<TankTransactionResponse>>, AppError> {
    let controller = TankController::new(state.pool.clone());
    let response = controller.record_refill(&user, id, request).await?;
    Ok(Json(response))
}

async fn record_dispense(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<TankDispenseRequest>,
) -> Result<Json<ApiResponse<TankTransactionResponse>>, AppError> {
    let controller = TankController::new(state.pool.clone());
    let response = controller.record_dispense(&user, id, request).await?;
    Ok(Json(response))
}

async fn get_tank_levels(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<FuelTankResponse>>, AppError> {
    let controller = TankController::new(state.pool.clone());
    let response = controller.get_tank_levels(&user).await?;
    Ok(Json(response))
}

async fn get_low_tank_alerts(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<FuelTankResponse>>, AppError> {
    let controller = TankController::new(state.pool.clone());
    let response = controller.get_low_tank_alerts(&user).await?;
    Ok(Json(response))
}

async fn get_tank_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<TankTransactionsQuery>,
) -> Result<Json<Vec<TankTransactionResponse>>, AppError> {
    let controller = TankController::new(state.pool.clone());
    let response = controller
        .get_tank_transactions(&user, id, query.limit)
        .await?;
    Ok(Json(response))
}
