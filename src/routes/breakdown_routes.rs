use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::breakdown_controller::BreakdownController;
use crate::dto::breakdown_dto::{
    AssignBreakdownRequest, BreakdownListQuery, BreakdownResponse, CreateBreakdownRequest,
    ResolveBreakdownRequest, UpdateBreakdownRequest,
};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_breakdown_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_breakdown))
        .route("/", get(list_breakdowns))
        .route("/:id", put(update_breakdown))
        .route("/:id/assign", post(assign_breakdown))
        .route("/:id/resolve", post(resolve_breakdown))
}

async fn create_breakdown(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBreakdownRequest>,
) -> Result<Json<ApiResponse<BreakdownResponse>>, AppError> {
    let controller = BreakdownController::new(state.pool.clone());
    let response = controller.create_breakdown(&user, request).await?;
    Ok(Json(response))
}

async fn update_breakdown(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateBreakdownRequest>,
) -> Result<Json<ApiResponse<BreakdownResponse>>, AppError> {
    let controller = BreakdownController::new(state.pool.clone());
    let response = controller.update_breakdown(&user, id, request).await?;
    Ok(Json(response))
}

async fn assign_breakdown(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<AssignBreakdownRequest>,
) -> Result<Json<ApiResponse<BreakdownResponse>>, AppError> {
    let controller = BreakdownController::new(state.pool.clone());
    let response = controller.assign_breakdown(&user, id, request).await?;
    Ok(Json(response))
}

async fn resolve_breakdown(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResolveBreakdownRequest>,
) -> Result<Json<ApiResponse<BreakdownResponse>>, AppError> {
    let controller = BreakdownController::new(state.pool.clone());
    let response = controller.resolve_breakdown(&user, id, request).await?;
    Ok(Json(response))
}

async fn list_breakdowns(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<BreakdownListQuery>,
) -> Result<Json<Vec<BreakdownResponse>>, AppError> {
    let controller = BreakdownController::new(state.pool.clone());
    let response = controller
        .list_breakdowns(&user, query.asset_id, query.limit)
        .await?;
    Ok(Json(response))
}
