use sea_orm::entity::prelude::*;

/// Catalog row. `customizations`, `add_ons` and `day_offers` are document
/// fields: `jsonb` arrays of `OptionDef` / `DayOffer` from `cart::types`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "foods")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub image: Option<String>,
    pub food_type: String,
    pub base_price: f64,
    pub discount_price: Option<f64>,
    pub packing_charge: f64,
    pub is_prebook: bool,
    pub is_active: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub customizations: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub add_ons: Json,
    #[sea_orm(column_type = "JsonBinary")]
    pub day_offers: Json,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendors,
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
