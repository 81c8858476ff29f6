use sea_orm::entity::prelude::*;

/// Coupon storage for the validate/mark-used contract. `used_by` is a
/// `jsonb` array of user ids for the one-use-per-user rule.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub discount_type: String,
    pub discount_value: f64,
    pub vendor_id: Option<Uuid>,
    pub min_order_amount: Option<f64>,
    pub usage_cap: Option<i32>,
    pub used_count: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub used_by: Json,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
