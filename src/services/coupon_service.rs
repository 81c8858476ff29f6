use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    cart::types::round2,
    db::OrmConn,
    entity::coupons::{ActiveModel as CouponActive, Column as CouponCol, Entity as Coupons},
    error::AppResult,
};

/// Outcome of the validate contract. Invalid never bubbles up as a request
/// failure from re-validation; the cart simply drops the coupon.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponCheck {
    Valid { discount: f64 },
    Invalid { reason: String },
}

pub async fn validate(
    orm: &OrmConn,
    code: &str,
    user_id: Uuid,
    order_amount: f64,
    vendor_id: Option<Uuid>,
) -> AppResult<CouponCheck> {
    let coupon = Coupons::find()
        .filter(CouponCol::Code.eq(code))
        .one(orm)
        .await?;
    let Some(coupon) = coupon else {
        return Ok(invalid("unknown coupon code"));
    };

    if !coupon.is_active {
        return Ok(invalid("coupon is no longer active"));
    }
    if let Some(restricted) = coupon.vendor_id {
        if vendor_id != Some(restricted) {
            return Ok(invalid("coupon is restricted to another vendor"));
        }
    }
    if let Some(min) = coupon.min_order_amount {
        if order_amount < min {
            return Ok(invalid(format!(
                "order amount is below the coupon minimum of {min}"
            )));
        }
    }
    if let Some(cap) = coupon.usage_cap {
        if coupon.used_count >= cap {
            return Ok(invalid("coupon usage cap reached"));
        }
    }
    let used_by: Vec<Uuid> = serde_json::from_value(coupon.used_by.clone())?;
    if used_by.contains(&user_id) {
        return Ok(invalid("coupon already used by this user"));
    }

    let discount = match coupon.discount_type.as_str() {
        "percentage" => order_amount * coupon.discount_value / 100.0,
        _ => coupon.discount_value.min(order_amount),
    };
    Ok(CouponCheck::Valid {
        discount: round2(discount),
    })
}

/// Record a redemption against the one-use-per-user list and the usage cap.
/// Called by the booking workflow once it accepts a cart snapshot.
pub async fn mark_used(orm: &OrmConn, code: &str, user_id: Uuid) -> AppResult<()> {
    let coupon = Coupons::find()
        .filter(CouponCol::Code.eq(code))
        .one(orm)
        .await?;
    let Some(coupon) = coupon else {
        return Ok(());
    };

    let mut used_by: Vec<Uuid> = serde_json::from_value(coupon.used_by.clone())?;
    if !used_by.contains(&user_id) {
        used_by.push(user_id);
    }
    let used_count = coupon.used_count + 1;

    let mut active: CouponActive = coupon.into();
    active.used_by = Set(serde_json::to_value(used_by)?);
    active.used_count = Set(used_count);
    active.update(orm).await?;
    Ok(())
}

fn invalid(reason: impl Into<String>) -> CouponCheck {
    CouponCheck::Invalid {
        reason: reason.into(),
    }
}
