use uuid::Uuid;

use super::types::{CartLine, SelectedOption};

/// Canonical identity of "this food with these modifiers", used to decide
/// whether an add-item request merges into an existing line or opens a new
/// one.
///
/// Customization quantities participate in identity except on
/// customization-priced foods, where only the chosen ids matter. Add-on
/// quantities never participate: add-ons never split a line by quantity.
/// Zero-quantity entries are removal directives, not identity.
pub fn selection_signature(
    food_id: Uuid,
    customizations: &[SelectedOption],
    add_ons: &[SelectedOption],
    uses_customization_price: bool,
) -> String {
    let mut custo: Vec<String> = customizations
        .iter()
        .filter(|c| c.quantity > 0)
        .map(|c| {
            let qty = if uses_customization_price { 1 } else { c.quantity };
            format!("{}:{}", c.id, qty)
        })
        .collect();
    custo.sort();

    let mut addons: Vec<String> = add_ons
        .iter()
        .filter(|a| a.quantity > 0)
        .map(|a| format!("{}:1", a.id))
        .collect();
    addons.sort();

    format!("{}|c[{}]|a[{}]", food_id, custo.join(","), addons.join(","))
}

/// Find the cart line an incoming selection should merge into.
///
/// Order of preference: exact signature match; for a request that only
/// removes add-ons, a same-food line holding any of the targeted add-ons;
/// otherwise any line for the same food, so repeated additions converge to
/// one line per food.
pub fn find_matching_line(
    lines: &[CartLine],
    food_id: Uuid,
    customizations: &[SelectedOption],
    add_ons: &[SelectedOption],
    uses_customization_price: bool,
) -> Option<usize> {
    let wanted = selection_signature(food_id, customizations, add_ons, uses_customization_price);
    if let Some(idx) = lines.iter().position(|line| {
        line.food_id == food_id
            && selection_signature(
                food_id,
                &line.customizations,
                &line.add_ons,
                uses_customization_price,
            ) == wanted
    }) {
        return Some(idx);
    }

    let only_add_on_removals = customizations.is_empty()
        && !add_ons.is_empty()
        && add_ons.iter().all(|a| a.quantity == 0);
    if only_add_on_removals {
        if let Some(idx) = lines.iter().position(|line| {
            line.food_id == food_id
                && line
                    .add_ons
                    .iter()
                    .any(|existing| add_ons.iter().any(|a| a.id == existing.id))
        }) {
            return Some(idx);
        }
    }

    lines.iter().position(|line| line.food_id == food_id)
}
