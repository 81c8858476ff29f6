use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::mutation::{QuantityOp, SelectionInput};
use crate::cart::types::{OptionDef, ServiceType};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub food_id: Uuid,
    pub quantity: QuantityOp,
    pub service_type: ServiceType,
    #[serde(default)]
    pub customizations: Vec<SelectionInput>,
    #[serde(default)]
    pub add_ons: Vec<SelectionInput>,
    /// When set, incoming add-on quantities replace instead of accumulate.
    #[serde(default)]
    pub update_add_ons: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectCartRequest {
    pub cart_code: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCouponRequest {
    pub code: String,
}

/// Catalog options of a line's food not yet selected on that line.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSelections {
    pub add_ons: Vec<OptionDef>,
    pub customizations: Vec<OptionDef>,
}
