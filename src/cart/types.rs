use chrono::Weekday;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Round a money amount to 2 decimal places. Applied at every point a
/// monetary field is stored or returned.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    DineIn,
    Delivery,
    Takeaway,
    Pickup,
    CarDineIn,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::DineIn => "dine_in",
            ServiceType::Delivery => "delivery",
            ServiceType::Takeaway => "takeaway",
            ServiceType::Pickup => "pickup",
            ServiceType::CarDineIn => "car_dine_in",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dine_in" => Some(ServiceType::DineIn),
            "delivery" => Some(ServiceType::Delivery),
            "takeaway" => Some(ServiceType::Takeaway),
            "pickup" => Some(ServiceType::Pickup),
            "car_dine_in" => Some(ServiceType::CarDineIn),
            _ => None,
        }
    }

    /// Packing charge applies only when the food leaves the premises.
    pub fn requires_packing(&self) -> bool {
        matches!(self, ServiceType::Delivery | ServiceType::Takeaway)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// A weekday- and time-window-scoped discount rule attached to a food.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayOffer {
    pub discount_type: DiscountType,
    pub discount_value: f64,
    /// Lowercase weekday names, e.g. `["monday", "friday"]`.
    pub active_days: Vec<String>,
    /// `HH:MM`, 24-hour clock.
    pub start_time: String,
    /// `HH:MM`; an end earlier than the start spans midnight.
    pub end_time: String,
    pub is_active: bool,
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

/// A customization or add-on a food offers, as defined in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionDef {
    pub id: String,
    pub name: String,
    pub price: f64,
}

/// A customization or add-on actually selected on a cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOption {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
}

/// One ordered row in a cart. Display fields are denormalized from the food
/// at the time of addition; `effective_price` and `item_total` are derived and
/// recomputed after every mutation, never set by a caller.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: Uuid,
    pub food_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    #[serde(rename = "type")]
    pub food_type: String,
    pub quantity: i32,
    pub base_price: f64,
    pub discount_price: Option<f64>,
    pub effective_price: f64,
    pub uses_customization_price: bool,
    pub customizations: Vec<SelectedOption>,
    pub add_ons: Vec<SelectedOption>,
    pub is_prebook: bool,
    pub packing_charge: f64,
    pub notes: Option<String>,
    pub item_total: f64,
}

/// Aggregate money fields, always a pure function of the line set plus the
/// GST percentage and any applied coupon discount.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub sub_total: f64,
    pub add_on_total: f64,
    pub customization_total: f64,
    pub packing_charge_total: f64,
    pub discount_total: f64,
    pub coupon_discount: f64,
    pub tax_amount: f64,
    pub tax_percentage: f64,
    pub grand_total: f64,
    pub item_count: i32,
}

/// Everything the engine needs to know about a food, resolved from the
/// catalog entity by the service layer.
#[derive(Debug, Clone)]
pub struct FoodInfo {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub food_type: String,
    pub base_price: f64,
    pub discount_price: Option<f64>,
    pub packing_charge: f64,
    pub is_prebook: bool,
    pub customizations: Vec<OptionDef>,
    pub add_ons: Vec<OptionDef>,
    pub day_offers: Vec<DayOffer>,
}

impl FoodInfo {
    /// A food with selectable customizations is priced purely from the sum of
    /// the selected customization prices.
    pub fn uses_customization_price(&self) -> bool {
        !self.customizations.is_empty()
    }
}
