use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::cart::pricing::PriceQuote;
use crate::cart::types::{CartLine, CartTotals, OptionDef};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorSummary {
    pub id: Uuid,
    pub name: String,
    pub profile_image: Option<String>,
    pub place: Option<String>,
    pub gst_percentage: f64,
}

/// The read shape the booking workflow and the UI consume. Always formatted
/// from a resolved working cart; an empty snapshot stands in when the user
/// has no cart.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    pub id: Option<Uuid>,
    pub cart_code: Option<String>,
    pub user: Uuid,
    pub service_type: Option<String>,
    pub is_prebook_cart: bool,
    pub vendor: Option<VendorSummary>,
    pub lines: Vec<CartLine>,
    pub coupon_code: Option<String>,
    pub totals: CartTotals,
    pub last_updated_at: Option<DateTime<Utc>>,
}

impl CartSnapshot {
    pub fn empty(user: Uuid) -> Self {
        Self {
            id: None,
            cart_code: None,
            user,
            service_type: None,
            is_prebook_cart: false,
            vendor: None,
            lines: Vec::new(),
            coupon_code: None,
            totals: CartTotals::default(),
            last_updated_at: None,
        }
    }
}

/// Catalog read shape; `price` is the pricing resolver's quote at request
/// time.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodView {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub food_type: String,
    pub is_prebook: bool,
    pub packing_charge: f64,
    pub customizations: Vec<OptionDef>,
    pub add_ons: Vec<OptionDef>,
    pub price: PriceQuote,
}
