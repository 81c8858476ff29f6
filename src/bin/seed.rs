use axum_foodcart_api::{
    cart::types::{DayOffer, DiscountType, OptionDef},
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        coupons::ActiveModel as CouponActive, foods::ActiveModel as FoodActive,
        users::ActiveModel as UserActive, vendors::ActiveModel as VendorActive,
    },
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let user_id = seed_user(&orm, "9900112233", "Asha").await?;
    let friend_id = seed_user(&orm, "9900445566", "Ravi").await?;
    let vendor_id = seed_vendor(&orm).await?;
    seed_foods(&orm, vendor_id).await?;
    seed_coupon(&orm, vendor_id).await?;

    println!("Seed completed. Users: {user_id}, {friend_id}. Vendor: {vendor_id}");
    Ok(())
}

async fn seed_user(orm: &DatabaseConnection, phone: &str, name: &str) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        phone: Set(phone.to_string()),
        name: Set(Some(name.to_string())),
        role: Set("user".into()),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    println!("Seeded user {phone}");
    Ok(user.id)
}

async fn seed_vendor(orm: &DatabaseConnection) -> anyhow::Result<Uuid> {
    let vendor = VendorActive {
        id: Set(Uuid::new_v4()),
        name: Set("Annapurna Kitchen".into()),
        profile_image: Set(None),
        place: Set(Some("MG Road".into())),
        gst_percentage: Set(5.0),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    println!("Seeded vendor {}", vendor.name);
    Ok(vendor.id)
}

async fn seed_foods(orm: &DatabaseConnection, vendor_id: Uuid) -> anyhow::Result<()> {
    let lunch_offer = vec![DayOffer {
        discount_type: DiscountType::Percentage,
        discount_value: 10.0,
        active_days: ["monday", "tuesday", "wednesday", "thursday", "friday"]
            .iter()
            .map(|d| d.to_string())
            .collect(),
        start_time: "12:00".into(),
        end_time: "15:00".into(),
        is_active: true,
    }];

    let add_ons = vec![
        OptionDef {
            id: "raita".into(),
            name: "Raita".into(),
            price: 25.0,
        },
        OptionDef {
            id: "papad".into(),
            name: "Papad".into(),
            price: 10.0,
        },
    ];

    let thali_sizes = vec![
        OptionDef {
            id: "half".into(),
            name: "Half Thali".into(),
            price: 120.0,
        },
        OptionDef {
            id: "full".into(),
            name: "Full Thali".into(),
            price: 199.0,
        },
    ];

    let foods = [
        ("Veg Biryani", 180.0, Some(149.0), false, vec![], add_ons.clone()),
        ("Thali", 0.0, None, false, thali_sizes, vec![]),
        ("Party Platter", 999.0, None, true, vec![], add_ons),
    ];

    for (name, base_price, discount_price, is_prebook, customizations, food_add_ons) in foods {
        FoodActive {
            id: Set(Uuid::new_v4()),
            vendor_id: Set(vendor_id),
            name: Set(name.to_string()),
            image: Set(None),
            food_type: Set("veg".into()),
            base_price: Set(base_price),
            discount_price: Set(discount_price),
            packing_charge: Set(15.0),
            is_prebook: Set(is_prebook),
            is_active: Set(true),
            customizations: Set(serde_json::to_value(customizations)?),
            add_ons: Set(serde_json::to_value(food_add_ons)?),
            day_offers: Set(serde_json::to_value(&lunch_offer)?),
            created_at: Set(Utc::now().into()),
        }
        .insert(orm)
        .await?;
        println!("Seeded food {name}");
    }
    Ok(())
}

async fn seed_coupon(orm: &DatabaseConnection, vendor_id: Uuid) -> anyhow::Result<()> {
    CouponActive {
        id: Set(Uuid::new_v4()),
        code: Set("WELCOME50".into()),
        discount_type: Set("fixed".into()),
        discount_value: Set(50.0),
        vendor_id: Set(Some(vendor_id)),
        min_order_amount: Set(Some(300.0)),
        usage_cap: Set(Some(1000)),
        used_count: Set(0),
        used_by: Set(serde_json::json!([])),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;
    println!("Seeded coupon WELCOME50");
    Ok(())
}
