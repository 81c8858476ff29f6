use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::foods::FoodList,
    error::AppResult,
    models::FoodView,
    response::ApiResponse,
    routes::params::FoodQuery,
    services::food_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_foods))
        .route("/{food_id}", get(get_food))
}

#[utoipa::path(
    get,
    path = "/api/foods",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("q" = Option<String>, Query, description = "Name search"),
        ("vendor_id" = Option<Uuid>, Query, description = "Restrict to one vendor")
    ),
    responses(
        (status = 200, description = "Active foods with resolved prices", body = ApiResponse<FoodList>)
    ),
    tag = "Foods"
)]
pub async fn list_foods(
    State(state): State<AppState>,
    Query(query): Query<FoodQuery>,
) -> AppResult<Json<ApiResponse<FoodList>>> {
    let resp = food_service::list_foods(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/foods/{food_id}",
    params(
        ("food_id" = Uuid, Path, description = "Food ID")
    ),
    responses(
        (status = 200, description = "Food with resolved price", body = ApiResponse<FoodView>),
        (status = 404, description = "Food not found"),
    ),
    tag = "Foods"
)]
pub async fn get_food(
    State(state): State<AppState>,
    Path(food_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FoodView>>> {
    let resp = food_service::get_food(&state, food_id).await?;
    Ok(Json(resp))
}
