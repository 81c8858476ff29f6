use super::types::{round2, CartLine, CartTotals};

/// Sum of add-on contributions for one line. Add-ons are priced per order,
/// not per unit of the line.
pub fn add_on_order_total(line: &CartLine) -> f64 {
    line.add_ons
        .iter()
        .map(|a| a.price * a.quantity as f64)
        .sum()
}

/// Per-unit customization contribution. Zero for customization-priced lines,
/// whose `effective_price` already carries the customization sum.
pub fn customization_contribution(line: &CartLine) -> f64 {
    if line.uses_customization_price {
        0.0
    } else {
        line.customizations
            .iter()
            .map(|c| c.price * c.quantity as f64)
            .sum()
    }
}

/// Recompute a line's derived `item_total` from its own fields.
pub fn refresh_line(line: &mut CartLine) {
    let unit_total =
        line.effective_price + customization_contribution(line) + line.packing_charge;
    line.item_total = round2(unit_total * line.quantity as f64 + add_on_order_total(line));
}

/// Recompute every aggregate from scratch. Totals are a projection of the
/// line set; they are never patched incrementally.
pub fn recompute(lines: &[CartLine], gst_percentage: f64, coupon_discount: f64) -> CartTotals {
    let mut sub_total = 0.0;
    let mut add_on_total = 0.0;
    let mut customization_total = 0.0;
    let mut packing_charge_total = 0.0;
    let mut discount_total = 0.0;
    let mut item_count = 0;

    for line in lines {
        sub_total += line.item_total;
        add_on_total += add_on_order_total(line);
        customization_total += customization_contribution(line) * line.quantity as f64;
        packing_charge_total += line.packing_charge * line.quantity as f64;
        if !line.uses_customization_price {
            discount_total +=
                (line.base_price - line.effective_price).max(0.0) * line.quantity as f64;
        }
        item_count += line.quantity;
    }

    let tax_amount = sub_total * gst_percentage / 100.0;
    let grand_total = (sub_total + tax_amount - coupon_discount).max(0.0);

    CartTotals {
        sub_total: round2(sub_total),
        add_on_total: round2(add_on_total),
        customization_total: round2(customization_total),
        packing_charge_total: round2(packing_charge_total),
        discount_total: round2(discount_total),
        coupon_discount: round2(coupon_discount),
        tax_amount: round2(tax_amount),
        tax_percentage: gst_percentage,
        grand_total: round2(grand_total),
        item_count,
    }
}
