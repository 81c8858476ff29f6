use anyhow::anyhow;
use chrono::Utc;
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    cart::mutation::{apply_add_item, resolve_selections, MutationKind, QuantityOp},
    cart::pricing::resolve_price,
    cart::totals,
    cart::types::{CartLine, CartTotals, FoodInfo, ServiceType},
    db::OrmConn,
    dto::cart::{AddItemRequest, ApplyCouponRequest, AvailableSelections, ConnectCartRequest},
    entity::{
        carts::{ActiveModel as CartActive, Column as CartCol, Entity as Carts, Model as CartModel},
        foods::Entity as Foods,
        vendors::{Entity as Vendors, Model as VendorModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CartSnapshot, VendorSummary},
    response::{ApiResponse, Meta},
    services::coupon_service::{self, CouponCheck},
    services::food_service::food_info_from_entity,
    state::AppState,
};

const CART_CODE_PREFIX: &str = "CART";
const CART_CODE_ATTEMPTS: u32 = 20;

pub async fn get_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartSnapshot>> {
    let (_guard, own, working) = lock_and_resolve(state, user.user_id).await?;
    let Some(working) = working else {
        return Ok(empty_response(user.user_id));
    };

    let lines = parse_lines(&working)?;

    // A lingering empty personal cart that nobody shares is noise; drop it.
    if lines.is_empty()
        && working.connected_cart.is_none()
        && parse_connected_users(&working)?.is_empty()
        && own.as_ref().map(|o| o.id) == Some(working.id)
    {
        Carts::delete_by_id(working.id).exec(&state.orm).await?;
        return Ok(empty_response(user.user_id));
    }

    // The vendor may have changed its GST rate since the cart last saved.
    let mut working = working;
    let mut vendor = None;
    if let Some(vendor_id) = working.vendor_id {
        vendor = Vendors::find_by_id(vendor_id).one(&state.orm).await?;
        if let Some(vendor) = &vendor {
            if (vendor.gst_percentage - working.gst_percentage).abs() > f64::EPSILON
                && !lines.is_empty()
            {
                working.gst_percentage = vendor.gst_percentage;
                if let Some(saved) = save_cart(&state.orm, working, lines).await? {
                    working = saved;
                } else {
                    return Ok(empty_response(user.user_id));
                }
            }
        }
    }

    let snap = snapshot_with_vendor(&working, vendor)?;
    Ok(ApiResponse::success("OK", snap, None))
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    payload: AddItemRequest,
) -> AppResult<ApiResponse<CartSnapshot>> {
    let food_model = Foods::find_by_id(payload.food_id)
        .one(&state.orm)
        .await?
        .filter(|f| f.is_active)
        .ok_or(AppError::NotFound)?;
    let food = food_info_from_entity(food_model)?;
    let customizations =
        resolve_selections(&food.customizations, &payload.customizations, "customization")?;
    let add_ons = resolve_selections(&food.add_ons, &payload.add_ons, "add-on")?;

    let (_guard, _own, working) = lock_and_resolve(state, user.user_id).await?;

    let (mut cart, created) = match working {
        Some(cart) => (cart, false),
        // Nothing to remove from, and no reason to materialize a cart.
        None if matches!(payload.quantity, QuantityOp::Remove | QuantityOp::Decrement) => {
            return Err(AppError::NotFound);
        }
        None => (create_cart(&state.orm, user.user_id).await?, true),
    };
    let mut lines = parse_lines(&cart)?;

    let outcome = async {
        if lines.is_empty() {
            // First line locks the cart to this vendor and service type.
            let vendor = load_vendor(&state.orm, food.vendor_id).await?;
            cart.vendor_id = Some(food.vendor_id);
            cart.service_type = Some(payload.service_type.as_str().to_string());
            cart.gst_percentage = vendor.gst_percentage;
        } else {
            check_cart_locks(&cart, &food, payload.service_type)?;
        }

        let quote = resolve_price(
            food.base_price,
            food.discount_price,
            &food.day_offers,
            Utc::now(),
        );
        apply_add_item(
            &mut lines,
            &food,
            &quote,
            payload.service_type,
            payload.quantity,
            customizations,
            add_ons,
            payload.update_add_ons,
            payload.notes,
        )
    }
    .await;
    let kind = match outcome {
        Ok(kind) => kind,
        Err(err) => {
            // A rejected first add must not leave an empty coded cart around
            // for someone to connect to.
            if created {
                Carts::delete_by_id(cart.id).exec(&state.orm).await?;
            }
            return Err(err);
        }
    };

    let saved = save_cart(&state.orm, cart, lines).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "cart_update",
        Some("carts"),
        Some(serde_json::json!({ "food_id": food.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let message = match kind {
        MutationKind::Created => "Item added",
        MutationKind::Updated => "Cart updated",
        MutationKind::Removed => "Item removed",
    };
    match saved {
        Some(model) => {
            let snap = snapshot(&state.orm, &model).await?;
            Ok(ApiResponse::success(message, snap, None))
        }
        None => Ok(ApiResponse::success(
            message,
            CartSnapshot::empty(user.user_id),
            Some(Meta::empty()),
        )),
    }
}

pub async fn remove_line(
    state: &AppState,
    user: &AuthUser,
    line_id: Uuid,
) -> AppResult<ApiResponse<CartSnapshot>> {
    let (_guard, _own, working) = lock_and_resolve(state, user.user_id).await?;
    let cart = working.ok_or(AppError::NotFound)?;

    let mut lines = parse_lines(&cart)?;
    let pos = lines
        .iter()
        .position(|l| l.id == line_id)
        .ok_or(AppError::NotFound)?;
    lines.remove(pos);

    let saved = save_cart(&state.orm, cart, lines).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "cart_line_remove",
        Some("carts"),
        Some(serde_json::json!({ "line_id": line_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    match saved {
        Some(model) => {
            let snap = snapshot(&state.orm, &model).await?;
            Ok(ApiResponse::success("Line removed", snap, None))
        }
        None => Ok(empty_response(user.user_id)),
    }
}

pub async fn clear_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartSnapshot>> {
    let (_guard, own, working) = lock_and_resolve(state, user.user_id).await?;

    if let Some(working) = working {
        delete_cart(&state.orm, &working).await?;
        if let Some(own) = own {
            if own.id != working.id {
                Carts::delete_by_id(own.id).exec(&state.orm).await?;
            }
        }
    }

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "cart_clear",
        Some("carts"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(empty_response(user.user_id))
}

pub async fn connect_cart(
    state: &AppState,
    user: &AuthUser,
    payload: ConnectCartRequest,
) -> AppResult<ApiResponse<CartSnapshot>> {
    let code = payload.cart_code.trim().to_uppercase();
    let target_id = Carts::find()
        .filter(CartCol::CartCode.eq(&code))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?
        .id;

    // Hold both the target's lock and the caller's own-cart lock: the target
    // gains a connected user while the caller's cart turns into a pointer,
    // and either side could otherwise race a concurrent mutation.
    let (_own_guard, _target_guard, own, target) = loop {
        let probe = find_own_cart(&state.orm, user.user_id).await?;
        let own_key = probe.map(|c| c.id).unwrap_or(user.user_id);
        let guards = lock_pair(state, own_key, target_id).await;
        let own = find_own_cart(&state.orm, user.user_id).await?;
        if own.as_ref().map(|c| c.id).unwrap_or(user.user_id) != own_key {
            continue;
        }
        let target = Carts::find_by_id(target_id)
            .one(&state.orm)
            .await?
            .ok_or(AppError::NotFound)?;
        break (guards.0, guards.1, own, target);
    };

    if target.user_id == user.user_id {
        return Err(AppError::Conflict("cannot connect to your own cart".into()));
    }
    // A pointer cart holds no lines of its own; letting a user attach to one
    // would route their writes into it behind the owner's back.
    if target.connected_cart.is_some() {
        return Err(AppError::Conflict(
            "that cart is itself connected to a shared cart".into(),
        ));
    }

    let now = Utc::now();
    match own {
        Some(own) => {
            if own.connected_cart.is_some() {
                return Err(AppError::Conflict(
                    "already connected to a shared cart".into(),
                ));
            }
            if !parse_lines(&own)?.is_empty() {
                return Err(AppError::Conflict(
                    "your cart must be empty before connecting".into(),
                ));
            }
            let mut active: CartActive = own.into();
            active.connected_cart = Set(Some(target.id));
            // A pointer never carries its own share code.
            active.cart_code = Set(None);
            active.vendor_id = Set(target.vendor_id);
            active.service_type = Set(target.service_type.clone());
            active.gst_percentage = Set(target.gst_percentage);
            active.updated_at = Set(now.into());
            active.update(&state.orm).await?;
        }
        None => {
            // A user connecting without any cart history gets a minimal
            // pointer record; it never receives its own share code.
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                cart_code: Set(None),
                vendor_id: Set(target.vendor_id),
                service_type: Set(target.service_type.clone()),
                is_prebook_cart: Set(false),
                lines: Set(serde_json::json!([])),
                coupon_code: Set(None),
                coupon_discount: Set(0.0),
                gst_percentage: Set(target.gst_percentage),
                totals: Set(serde_json::to_value(CartTotals::default())?),
                connected_cart: Set(Some(target.id)),
                connected_users: Set(serde_json::json!([])),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            }
            .insert(&state.orm)
            .await?;
        }
    }

    let mut users = parse_connected_users(&target)?;
    if !users.contains(&user.user_id) {
        users.push(user.user_id);
    }
    let mut active: CartActive = target.into();
    active.connected_users = Set(serde_json::to_value(users)?);
    active.updated_at = Set(now.into());
    let target = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "cart_connect",
        Some("carts"),
        Some(serde_json::json!({ "cart_code": code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let snap = snapshot(&state.orm, &target).await?;
    Ok(ApiResponse::success("Connected", snap, None))
}

pub async fn disconnect_cart(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CartSnapshot>> {
    let own = find_own_cart(&state.orm, user.user_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("you have no cart to disconnect".into()))?;
    let Some(target_id) = own.connected_cart else {
        return Err(AppError::BadRequest("cart is not connected".into()));
    };

    let _guard = state.cart_locks.acquire(target_id).await;

    let needs_code = own.cart_code.is_none();
    let mut active: CartActive = own.into();
    active.connected_cart = Set(None);
    if needs_code {
        // Back to a personal cart, which is shareable again.
        active.cart_code = Set(Some(generate_cart_code(&state.orm).await?));
    }
    active.vendor_id = Set(None);
    active.service_type = Set(None);
    active.updated_at = Set(Utc::now().into());
    let own = active.update(&state.orm).await?;

    if let Some(target) = Carts::find_by_id(target_id).one(&state.orm).await? {
        let mut users = parse_connected_users(&target)?;
        users.retain(|u| *u != user.user_id);
        let mut active: CartActive = target.into();
        active.connected_users = Set(serde_json::to_value(users)?);
        active.update(&state.orm).await?;
    }

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "cart_disconnect",
        Some("carts"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let snap = snapshot(&state.orm, &own).await?;
    Ok(ApiResponse::success("Disconnected", snap, None))
}

pub async fn list_available_selections(
    state: &AppState,
    user: &AuthUser,
    line_id: Uuid,
) -> AppResult<ApiResponse<AvailableSelections>> {
    let (_own, working) = find_working(&state.orm, user.user_id).await?;
    let cart = working.ok_or(AppError::NotFound)?;
    let lines = parse_lines(&cart)?;
    let line = lines
        .iter()
        .find(|l| l.id == line_id)
        .ok_or(AppError::NotFound)?;

    let food_model = Foods::find_by_id(line.food_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let food = food_info_from_entity(food_model)?;

    let add_ons = food
        .add_ons
        .into_iter()
        .filter(|def| !line.add_ons.iter().any(|sel| sel.id == def.id))
        .collect();
    let customizations = food
        .customizations
        .into_iter()
        .filter(|def| !line.customizations.iter().any(|sel| sel.id == def.id))
        .collect();

    Ok(ApiResponse::success(
        "Available selections",
        AvailableSelections {
            add_ons,
            customizations,
        },
        None,
    ))
}

pub async fn apply_coupon(
    state: &AppState,
    user: &AuthUser,
    payload: ApplyCouponRequest,
) -> AppResult<ApiResponse<CartSnapshot>> {
    let code = payload.code.trim().to_uppercase();
    let (_guard, _own, working) = lock_and_resolve(state, user.user_id).await?;
    let mut cart = working
        .ok_or_else(|| AppError::BadRequest("cart is empty".into()))?;
    let lines = parse_lines(&cart)?;
    if lines.is_empty() {
        return Err(AppError::BadRequest("cart is empty".into()));
    }

    let base = totals::recompute(&lines, cart.gst_percentage, 0.0);
    let order_amount = base.sub_total + base.tax_amount;
    match coupon_service::validate(&state.orm, &code, user.user_id, order_amount, cart.vendor_id)
        .await?
    {
        CouponCheck::Valid { .. } => {
            cart.coupon_code = Some(code.clone());
        }
        CouponCheck::Invalid { reason } => return Err(AppError::BadRequest(reason)),
    }

    let saved = save_cart(&state.orm, cart, lines).await?;

    if let Err(err) = log_audit(
        &state.orm,
        Some(user.user_id),
        "coupon_apply",
        Some("carts"),
        Some(serde_json::json!({ "code": code })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    match saved {
        Some(model) => {
            let snap = snapshot(&state.orm, &model).await?;
            Ok(ApiResponse::success("Coupon applied", snap, None))
        }
        None => Ok(empty_response(user.user_id)),
    }
}

pub async fn remove_coupon(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<CartSnapshot>> {
    let (_guard, _own, working) = lock_and_resolve(state, user.user_id).await?;
    let mut cart = working.ok_or(AppError::NotFound)?;
    let lines = parse_lines(&cart)?;
    cart.coupon_code = None;

    let saved = save_cart(&state.orm, cart, lines).await?;
    match saved {
        Some(model) => {
            let snap = snapshot(&state.orm, &model).await?;
            Ok(ApiResponse::success("Coupon removed", snap, None))
        }
        None => Ok(empty_response(user.user_id)),
    }
}

// ---------------------------------------------------------------------------
// shared-cart resolution and persistence helpers

async fn find_own_cart(orm: &OrmConn, user_id: Uuid) -> AppResult<Option<CartModel>> {
    Ok(Carts::find()
        .filter(CartCol::UserId.eq(user_id))
        .one(orm)
        .await?)
}

/// Resolve the cart this user's operations target: their own, or the shared
/// cart their pointer names. A pointer at a vanished cart is cleared on the
/// spot and the user falls back to their (empty) personal cart.
async fn find_working(
    orm: &OrmConn,
    user_id: Uuid,
) -> AppResult<(Option<CartModel>, Option<CartModel>)> {
    let Some(own) = find_own_cart(orm, user_id).await? else {
        return Ok((None, None));
    };
    let Some(target_id) = own.connected_cart else {
        return Ok((Some(own.clone()), Some(own)));
    };
    match Carts::find_by_id(target_id).one(orm).await? {
        Some(target) => Ok((Some(own), Some(target))),
        None => {
            tracing::warn!(cart_id = %own.id, "clearing dangling connected-cart pointer");
            let mut active: CartActive = own.into();
            active.connected_cart = Set(None);
            active.vendor_id = Set(None);
            active.service_type = Set(None);
            let healed = active.update(orm).await?;
            Ok((Some(healed.clone()), Some(healed)))
        }
    }
}

/// Serialize this user's mutations against the resolved cart. The lock is
/// keyed by the working cart so that two users attached to one shared cart
/// contend on the same mutex; before any cart exists the user id stands in.
async fn lock_and_resolve(
    state: &AppState,
    user_id: Uuid,
) -> AppResult<(OwnedMutexGuard<()>, Option<CartModel>, Option<CartModel>)> {
    loop {
        let (_, probe) = find_working(&state.orm, user_id).await?;
        let key = probe.map(|c| c.id).unwrap_or(user_id);
        let guard = state.cart_locks.acquire(key).await;
        // Reload under the lock so the mutation starts from current state. A
        // connect or disconnect may have re-targeted the pointer between the
        // probe and the acquire; in that case the guard protects the wrong
        // cart, so drop it and lock the new target instead.
        let (own, working) = find_working(&state.orm, user_id).await?;
        if working.as_ref().map(|c| c.id).unwrap_or(user_id) == key {
            return Ok((guard, own, working));
        }
    }
}

/// Acquire two cart locks in id order so concurrent pair-lockers cannot
/// deadlock on each other.
async fn lock_pair(
    state: &AppState,
    a: Uuid,
    b: Uuid,
) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
    if a <= b {
        let first = state.cart_locks.acquire(a).await;
        let second = state.cart_locks.acquire(b).await;
        (first, second)
    } else {
        let first = state.cart_locks.acquire(b).await;
        let second = state.cart_locks.acquire(a).await;
        (second, first)
    }
}

fn parse_lines(model: &CartModel) -> AppResult<Vec<CartLine>> {
    Ok(serde_json::from_value(model.lines.clone())?)
}

fn parse_connected_users(model: &CartModel) -> AppResult<Vec<Uuid>> {
    Ok(serde_json::from_value(model.connected_users.clone())?)
}

async fn load_vendor(orm: &OrmConn, vendor_id: Uuid) -> AppResult<VendorModel> {
    Vendors::find_by_id(vendor_id)
        .one(orm)
        .await?
        .ok_or(AppError::NotFound)
}

fn check_cart_locks(cart: &CartModel, food: &FoodInfo, service_type: ServiceType) -> AppResult<()> {
    if cart.vendor_id != Some(food.vendor_id) {
        return Err(AppError::Conflict(
            "cart holds items from another vendor".into(),
        ));
    }
    if cart.service_type.as_deref() != Some(service_type.as_str()) {
        return Err(AppError::Conflict(format!(
            "cart is locked to service type {}",
            cart.service_type.as_deref().unwrap_or("none")
        )));
    }
    Ok(())
}

/// Persist a mutated line set: derive the prebook flag, re-validate any
/// attached coupon against the new order amount (stripping it on failure
/// rather than failing the mutation), recompute totals, and write. An empty
/// line set deletes the cart instead, after detaching every connected user.
async fn save_cart(
    orm: &OrmConn,
    cart: CartModel,
    lines: Vec<CartLine>,
) -> AppResult<Option<CartModel>> {
    if lines.is_empty() {
        delete_cart(orm, &cart).await?;
        return Ok(None);
    }

    let is_prebook_cart = lines.iter().all(|l| l.is_prebook);
    let base = totals::recompute(&lines, cart.gst_percentage, 0.0);
    let order_amount = base.sub_total + base.tax_amount;

    let (coupon_code, coupon_discount) = match &cart.coupon_code {
        Some(code) => {
            match coupon_service::validate(orm, code, cart.user_id, order_amount, cart.vendor_id)
                .await?
            {
                CouponCheck::Valid { discount } => (Some(code.clone()), discount),
                CouponCheck::Invalid { reason } => {
                    tracing::debug!(code, reason, "stripping invalid coupon from cart");
                    (None, 0.0)
                }
            }
        }
        None => (None, 0.0),
    };

    let computed = totals::recompute(&lines, cart.gst_percentage, coupon_discount);

    let gst_percentage = cart.gst_percentage;
    let vendor_id = cart.vendor_id;
    let service_type = cart.service_type.clone();
    let mut active: CartActive = cart.into();
    active.lines = Set(serde_json::to_value(&lines)?);
    active.totals = Set(serde_json::to_value(&computed)?);
    active.is_prebook_cart = Set(is_prebook_cart);
    active.coupon_code = Set(coupon_code);
    active.coupon_discount = Set(coupon_discount);
    active.gst_percentage = Set(gst_percentage);
    active.vendor_id = Set(vendor_id);
    active.service_type = Set(service_type);
    active.updated_at = Set(Utc::now().into());
    Ok(Some(active.update(orm).await?))
}

/// Detach every user pointing at this cart, then delete it.
async fn delete_cart(orm: &OrmConn, cart: &CartModel) -> AppResult<()> {
    let pointers = Carts::find()
        .filter(CartCol::ConnectedCart.eq(cart.id))
        .all(orm)
        .await?;
    for pointer in pointers {
        let mut active: CartActive = pointer.into();
        active.connected_cart = Set(None);
        active.vendor_id = Set(None);
        active.service_type = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(orm).await?;
    }
    Carts::delete_by_id(cart.id).exec(orm).await?;
    Ok(())
}

async fn create_cart(orm: &OrmConn, user_id: Uuid) -> AppResult<CartModel> {
    let code = generate_cart_code(orm).await?;
    let now = Utc::now();
    let cart = CartActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        cart_code: Set(Some(code)),
        vendor_id: Set(None),
        service_type: Set(None),
        is_prebook_cart: Set(false),
        lines: Set(serde_json::json!([])),
        coupon_code: Set(None),
        coupon_discount: Set(0.0),
        gst_percentage: Set(0.0),
        totals: Set(serde_json::to_value(CartTotals::default())?),
        connected_cart: Set(None),
        connected_users: Set(serde_json::json!([])),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(orm)
    .await?;
    Ok(cart)
}

/// `CART` plus a random 4-digit suffix, retried against uniqueness a bounded
/// number of times.
async fn generate_cart_code(orm: &OrmConn) -> AppResult<String> {
    for _ in 0..CART_CODE_ATTEMPTS {
        let suffix: u32 = rand::thread_rng().gen_range(0..10_000);
        let code = format!("{CART_CODE_PREFIX}{suffix:04}");
        let taken = Carts::find()
            .filter(CartCol::CartCode.eq(&code))
            .one(orm)
            .await?
            .is_some();
        if !taken {
            return Ok(code);
        }
    }
    Err(AppError::Internal(anyhow!(
        "exhausted attempts to allocate a unique cart code"
    )))
}

async fn snapshot(orm: &OrmConn, model: &CartModel) -> AppResult<CartSnapshot> {
    let vendor = match model.vendor_id {
        Some(vendor_id) => Vendors::find_by_id(vendor_id).one(orm).await?,
        None => None,
    };
    snapshot_with_vendor(model, vendor)
}

/// Format a snapshot from a cart and an already-loaded vendor row, so callers
/// that have the vendor in hand skip the lookup.
fn snapshot_with_vendor(
    model: &CartModel,
    vendor: Option<VendorModel>,
) -> AppResult<CartSnapshot> {
    let vendor = vendor.map(|v| VendorSummary {
        id: v.id,
        name: v.name,
        profile_image: v.profile_image,
        place: v.place,
        gst_percentage: v.gst_percentage,
    });

    Ok(CartSnapshot {
        id: Some(model.id),
        cart_code: model.cart_code.clone(),
        user: model.user_id,
        service_type: model.service_type.clone(),
        is_prebook_cart: model.is_prebook_cart,
        vendor,
        lines: parse_lines(model)?,
        coupon_code: model.coupon_code.clone(),
        totals: serde_json::from_value(model.totals.clone())?,
        last_updated_at: Some(model.updated_at.with_timezone(&Utc)),
    })
}

fn empty_response(user_id: Uuid) -> ApiResponse<CartSnapshot> {
    ApiResponse::success("OK", CartSnapshot::empty(user_id), Some(Meta::empty()))
}
