use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::pricing::PriceQuote;
use super::signature::find_matching_line;
use super::totals::refresh_line;
use super::types::{round2, CartLine, FoodInfo, OptionDef, SelectedOption, ServiceType};

/// Quantity semantics as an explicit tagged operation rather than a value
/// whose JSON shape is interpreted. `Set` is absolute, not additive;
/// `{"op": "set", "value": 0}` is spelled `{"op": "remove"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum QuantityOp {
    Increment,
    Decrement,
    Set(i32),
    Remove,
}

/// One customization or add-on pick on an add-item request. Quantity 0 asks
/// for removal of that entry from the matched line.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectionInput {
    pub id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Created,
    Updated,
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Incoming quantity overwrites the existing entry's quantity.
    Replace,
    /// Incoming quantity adds onto the existing entry's quantity.
    Accumulate,
}

/// Look up each pick against the food's defined options, rejecting unknown
/// ids and negative quantities before anything is mutated.
pub fn resolve_selections(
    defs: &[OptionDef],
    picks: &[SelectionInput],
    kind: &str,
) -> AppResult<Vec<SelectedOption>> {
    picks
        .iter()
        .map(|pick| {
            if pick.quantity < 0 {
                return Err(AppError::BadRequest(format!(
                    "{kind} quantity cannot be negative"
                )));
            }
            let def = defs.iter().find(|d| d.id == pick.id).ok_or_else(|| {
                AppError::BadRequest(format!("unknown {kind} id {}", pick.id))
            })?;
            Ok(SelectedOption {
                id: def.id.clone(),
                name: def.name.clone(),
                price: def.price,
                quantity: pick.quantity,
            })
        })
        .collect()
}

/// Merge incoming selections into a line's existing ones. Quantity 0 removes
/// the entry; a known id is replaced or accumulated per the policy; a new id
/// is appended.
pub fn merge_selections(
    existing: &mut Vec<SelectedOption>,
    incoming: &[SelectedOption],
    policy: MergePolicy,
) {
    for entry in incoming {
        if entry.quantity == 0 {
            existing.retain(|e| e.id != entry.id);
            continue;
        }
        match existing.iter_mut().find(|e| e.id == entry.id) {
            Some(current) => {
                current.quantity = match policy {
                    MergePolicy::Replace => entry.quantity,
                    MergePolicy::Accumulate => current.quantity + entry.quantity,
                };
            }
            None => existing.push(entry.clone()),
        }
    }
}

/// A cart cannot mix prebook and regular lines, and holds at most one
/// prebook line. `matched` is the line the request would merge into, which
/// does not count against the single-prebook rule.
fn check_prebook_rules(
    lines: &[CartLine],
    food: &FoodInfo,
    matched: Option<usize>,
) -> AppResult<()> {
    if food.is_prebook {
        if lines.iter().any(|l| !l.is_prebook) {
            return Err(AppError::Conflict(
                "cart holds regular items; prebook items cannot be mixed in".into(),
            ));
        }
        let other_prebook = lines
            .iter()
            .enumerate()
            .any(|(i, l)| l.is_prebook && Some(i) != matched);
        if other_prebook {
            return Err(AppError::Conflict(
                "cart already holds a prebook item".into(),
            ));
        }
    } else if lines.iter().any(|l| l.is_prebook) {
        return Err(AppError::Conflict(
            "cart holds a prebook item; regular items cannot be mixed in".into(),
        ));
    }
    Ok(())
}

fn effective_unit_price(
    uses_customization_price: bool,
    quote: &PriceQuote,
    customizations: &[SelectedOption],
) -> f64 {
    if uses_customization_price {
        round2(
            customizations
                .iter()
                .map(|c| c.price * c.quantity as f64)
                .sum(),
        )
    } else {
        quote.final_price
    }
}

/// Apply one add-item request to the line set.
///
/// Resolves the target line through the selection signature, interprets the
/// quantity operation, merges selections, and leaves every derived money
/// field on the touched line recomputed. Aggregate totals are the caller's
/// concern.
#[allow(clippy::too_many_arguments)]
pub fn apply_add_item(
    lines: &mut Vec<CartLine>,
    food: &FoodInfo,
    quote: &PriceQuote,
    service_type: ServiceType,
    op: QuantityOp,
    customizations: Vec<SelectedOption>,
    add_ons: Vec<SelectedOption>,
    update_add_ons: bool,
    notes: Option<String>,
) -> AppResult<MutationKind> {
    if let QuantityOp::Set(n) = op {
        if n <= 0 {
            return Err(AppError::BadRequest(
                "set quantity must be a positive integer".into(),
            ));
        }
    }

    let ucp = food.uses_customization_price();
    let matched = find_matching_line(lines, food.id, &customizations, &add_ons, ucp);
    check_prebook_rules(lines, food, matched)?;

    let Some(idx) = matched else {
        return match op {
            QuantityOp::Remove | QuantityOp::Decrement => Err(AppError::NotFound),
            QuantityOp::Increment | QuantityOp::Set(_) => {
                let quantity = match op {
                    QuantityOp::Set(n) if !ucp => n,
                    _ => 1,
                };
                let line = new_line(
                    food,
                    quote,
                    service_type,
                    quantity,
                    customizations,
                    add_ons,
                    notes,
                )?;
                lines.push(line);
                Ok(MutationKind::Created)
            }
        };
    };

    if op == QuantityOp::Remove {
        lines.remove(idx);
        return Ok(MutationKind::Removed);
    }

    {
        let line = &mut lines[idx];
        match op {
            QuantityOp::Increment => line.quantity += 1,
            QuantityOp::Decrement => line.quantity -= 1,
            QuantityOp::Set(n) => line.quantity = n,
            QuantityOp::Remove => unreachable!(),
        }
    }
    if lines[idx].quantity <= 0 {
        lines.remove(idx);
        return Ok(MutationKind::Removed);
    }

    {
        let line = &mut lines[idx];
        // Customization-priced lines always carry quantity 1; the selections
        // themselves carry the counts.
        if ucp {
            line.quantity = 1;
        }

        let customization_policy = if ucp {
            MergePolicy::Replace
        } else {
            MergePolicy::Accumulate
        };
        merge_selections(&mut line.customizations, &customizations, customization_policy);

        let add_on_policy = if ucp || update_add_ons {
            MergePolicy::Replace
        } else {
            MergePolicy::Accumulate
        };
        merge_selections(&mut line.add_ons, &add_ons, add_on_policy);
    }

    if ucp && lines[idx].customizations.is_empty() {
        lines.remove(idx);
        return Ok(MutationKind::Removed);
    }

    let line = &mut lines[idx];
    if notes.is_some() {
        line.notes = notes;
    }
    line.base_price = quote.actual_price;
    line.discount_price = quote.discount_price;
    line.effective_price = effective_unit_price(ucp, quote, &line.customizations);
    refresh_line(line);
    Ok(MutationKind::Updated)
}

fn new_line(
    food: &FoodInfo,
    quote: &PriceQuote,
    service_type: ServiceType,
    quantity: i32,
    customizations: Vec<SelectedOption>,
    add_ons: Vec<SelectedOption>,
    notes: Option<String>,
) -> AppResult<CartLine> {
    let ucp = food.uses_customization_price();
    let customizations: Vec<SelectedOption> = customizations
        .into_iter()
        .filter(|c| c.quantity > 0)
        .collect();
    let add_ons: Vec<SelectedOption> = add_ons
        .into_iter()
        .filter(|a| a.quantity > 0)
        .collect();

    if ucp && customizations.is_empty() {
        return Err(AppError::BadRequest(format!(
            "{} requires a customization selection",
            food.name
        )));
    }

    let packing_charge = if service_type.requires_packing() {
        food.packing_charge
    } else {
        0.0
    };

    let mut line = CartLine {
        id: uuid::Uuid::new_v4(),
        food_id: food.id,
        name: food.name.clone(),
        image: food.image.clone(),
        food_type: food.food_type.clone(),
        quantity,
        base_price: quote.actual_price,
        discount_price: quote.discount_price,
        effective_price: effective_unit_price(ucp, quote, &customizations),
        uses_customization_price: ucp,
        customizations,
        add_ons,
        is_prebook: food.is_prebook,
        packing_charge,
        notes,
        item_total: 0.0,
    };
    refresh_line(&mut line);
    Ok(line)
}
