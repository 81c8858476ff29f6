use sea_orm::entity::prelude::*;

/// One cart per user. A cart whose `connected_cart` is set is a pointer:
/// its owner's reads and writes target that other cart and `lines` stays
/// empty. `lines`, `totals` and `connected_users` are `jsonb` documents
/// (`Vec<CartLine>`, `CartTotals`, `Vec<Uuid>`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "carts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    #[sea_orm(unique)]
    pub cart_code: Option<String>,
    pub vendor_id: Option<Uuid>,
    pub service_type: Option<String>,
    pub is_prebook_cart: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub lines: Json,
    pub coupon_code: Option<String>,
    pub coupon_discount: f64,
    pub gst_percentage: f64,
    #[sea_orm(column_type = "JsonBinary")]
    pub totals: Json,
    pub connected_cart: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub connected_users: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendors,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
