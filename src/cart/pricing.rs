use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::types::{round2, weekday_name, DayOffer, DiscountType};

/// Resolved unit pricing for one food at one instant. Used both for cart-line
/// pricing and for catalog display.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub actual_price: f64,
    pub discount_price: Option<f64>,
    /// Price after the matched day offer, present whenever an offer matched
    /// the reference weekday even if its time window did not.
    pub special_offer_price: Option<f64>,
    /// The price a cart line pays per unit.
    pub final_price: f64,
}

/// Resolve the effective unit price of a food.
///
/// A discount price only counts when it undercuts the base price. Among the
/// active day offers listing the reference weekday, one whose time window
/// contains the reference time wins; failing that, the first weekday match is
/// reported as `special_offer_price` but does not change `final_price`.
pub fn resolve_price(
    base_price: f64,
    discount_price: Option<f64>,
    offers: &[DayOffer],
    at: DateTime<Utc>,
) -> PriceQuote {
    let discount = discount_price.filter(|d| *d < base_price);
    let price_before_offer = discount.unwrap_or(base_price);

    let today = weekday_name(at.weekday());
    let minute_of_day = (at.hour() * 60 + at.minute()) as i32;

    let day_matches: Vec<&DayOffer> = offers
        .iter()
        .filter(|o| o.is_active && o.active_days.iter().any(|d| d == today))
        .collect();

    let in_window = day_matches
        .iter()
        .copied()
        .find(|o| window_contains(&o.start_time, &o.end_time, minute_of_day));
    let chosen = in_window.or_else(|| day_matches.first().copied());
    let currently_active = in_window.is_some();

    let special_offer_price = chosen.map(|o| round2(apply_offer(o, price_before_offer)));
    let final_price = if currently_active {
        special_offer_price.unwrap_or(price_before_offer)
    } else {
        price_before_offer
    };

    PriceQuote {
        actual_price: round2(base_price),
        discount_price: discount.map(round2),
        special_offer_price,
        final_price: round2(final_price),
    }
}

fn apply_offer(offer: &DayOffer, price: f64) -> f64 {
    match offer.discount_type {
        DiscountType::Percentage => price * (1.0 - offer.discount_value / 100.0),
        DiscountType::Fixed => (price - offer.discount_value).max(0.0),
    }
}

/// `[start, end)` in minutes-of-day; an end before the start spans midnight.
fn window_contains(start: &str, end: &str, minute_of_day: i32) -> bool {
    let (Some(start), Some(end)) = (parse_minutes(start), parse_minutes(end)) else {
        return false;
    };
    if start < end {
        minute_of_day >= start && minute_of_day < end
    } else if start > end {
        minute_of_day >= start || minute_of_day < end
    } else {
        false
    }
}

fn parse_minutes(hhmm: &str) -> Option<i32> {
    let (h, m) = hhmm.split_once(':')?;
    let h: i32 = h.parse().ok()?;
    let m: i32 = m.parse().ok()?;
    if (0..24).contains(&h) && (0..60).contains(&m) {
        Some(h * 60 + m)
    } else {
        None
    }
}
