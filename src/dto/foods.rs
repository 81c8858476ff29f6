use serde::Serialize;
use utoipa::ToSchema;

use crate::models::FoodView;

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FoodList {
    #[schema(value_type = Vec<FoodView>)]
    pub items: Vec<FoodView>,
}
