use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::{
    cart::pricing::resolve_price,
    cart::types::FoodInfo,
    dto::foods::FoodList,
    entity::foods::{Column as FoodCol, Entity as Foods, Model as FoodModel},
    error::{AppError, AppResult},
    models::FoodView,
    response::{ApiResponse, Meta},
    routes::params::FoodQuery,
    state::AppState,
};

/// Parse a catalog row's document fields into the engine's food description.
pub fn food_info_from_entity(model: FoodModel) -> AppResult<FoodInfo> {
    Ok(FoodInfo {
        id: model.id,
        vendor_id: model.vendor_id,
        name: model.name,
        image: model.image,
        food_type: model.food_type,
        base_price: model.base_price,
        discount_price: model.discount_price,
        packing_charge: model.packing_charge,
        is_prebook: model.is_prebook,
        customizations: serde_json::from_value(model.customizations)?,
        add_ons: serde_json::from_value(model.add_ons)?,
        day_offers: serde_json::from_value(model.day_offers)?,
    })
}

/// Catalog display reuses the same pricing resolver as cart lines.
pub fn food_view(info: FoodInfo, at: DateTime<Utc>) -> FoodView {
    let price = resolve_price(info.base_price, info.discount_price, &info.day_offers, at);
    FoodView {
        id: info.id,
        vendor_id: info.vendor_id,
        name: info.name,
        image: info.image,
        food_type: info.food_type,
        is_prebook: info.is_prebook,
        packing_charge: info.packing_charge,
        customizations: info.customizations,
        add_ons: info.add_ons,
        price,
    }
}

pub async fn list_foods(state: &AppState, query: FoodQuery) -> AppResult<ApiResponse<FoodList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(FoodCol::IsActive.eq(true));

    if let Some(vendor_id) = query.vendor_id {
        condition = condition.add(FoodCol::VendorId.eq(vendor_id));
    }
    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(Expr::col(FoodCol::Name).ilike(pattern));
    }

    let finder = Foods::find().filter(condition);
    let total = finder.clone().count(&state.orm).await? as i64;

    let now = Utc::now();
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|model| food_info_from_entity(model).map(|info| food_view(info, now)))
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Foods", FoodList { items }, Some(meta)))
}

pub async fn get_food(state: &AppState, id: Uuid) -> AppResult<ApiResponse<FoodView>> {
    let model = Foods::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let view = food_view(food_info_from_entity(model)?, Utc::now());
    Ok(ApiResponse::success("Food", view, None))
}
