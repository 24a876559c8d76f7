//! Order API Handlers
//!
//! Creation, scoped listing, tracking, and the lifecycle transitions.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use surrealdb::RecordId;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderStatus, Role};
use crate::db::repository::{AccountRepository, OrderRepository};
use crate::orders::lifecycle::{Transition, transition_to};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_ORDER_ID_LEN, MAX_ORDER_ITEMS,
    MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text,
};
use crate::utils::{AppError, AppResult};
use shared::client::{AssignRequest, CreateOrderRequest, StatusUpdateRequest};
use shared::util::now_millis;

const DEFAULT_PAYMENT_METHOD: &str = "Cash on Delivery";

#[derive(Debug, Deserialize)]
pub struct VendorOrdersQuery {
    pub vendor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct PartnerOrdersQuery {
    pub partner_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    pub order_id: String,
    #[serde(default)]
    pub customer_id: Option<String>,
}

/// Create a new order
///
/// The caller must be the customer named in the body. The stated total is
/// recomputed from the items, the vendor is resolved from the first item's
/// shop name, and the order always starts out Pending.
pub async fn create(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    user.require_role(Role::Customer)?;
    if user.id != req.customer_id {
        return Err(AppError::forbidden(
            "Orders can only be placed for your own account",
        ));
    }

    validate_required_text(&req.order_id, "order_id", MAX_ORDER_ID_LEN)?;
    validate_order_items(&req.items)?;
    validate_delivery_address(&req.delivery_address)?;
    validate_optional_text(&req.payment_method, "payment_method", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&req.customer_notes, "customer_notes", MAX_NOTE_LEN)?;

    // The client's total must agree with Σ price × quantity to the cent
    let computed: Decimal = req
        .items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();
    if (computed - req.total_amount).abs() > Decimal::new(1, 2) {
        return Err(AppError::validation(format!(
            "total_amount {} does not match item total {}",
            req.total_amount, computed
        )));
    }

    let accounts = AccountRepository::new(state.db.clone());

    // Customer snapshot comes from the account record, not the token
    let customer = accounts
        .find_by_id(&req.customer_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Customer {} not found", req.customer_id)))?;
    let customer_id = customer
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Customer record missing id"))?;

    // Vendor resolution: trimmed, case-insensitive match on the first item's shop
    let shop_name = &req.items[0].shop_name;
    let vendor = accounts
        .find_vendor_by_shop_name(shop_name)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No shop named '{}'", shop_name.trim())))?;
    let vendor_id = vendor
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Vendor record missing id"))?;
    let vendor_shop = vendor
        .shop_name
        .clone()
        .ok_or_else(|| AppError::internal("Vendor record missing shop name"))?;

    let data = OrderCreate {
        order_id: req.order_id,
        customer_id,
        customer_email: customer.email.clone(),
        customer_name: customer.name.clone(),
        vendor_id,
        shop_name: vendor_shop,
        items: req.items,
        total_amount: req.total_amount,
        delivery_address: req.delivery_address,
        payment_method: req
            .payment_method
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
        customer_notes: req.customer_notes,
    };

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.create(data).await?;

    tracing::info!(
        order_id = %order.order_id,
        customer = %order.customer_email,
        shop = %order.shop_name,
        total = %order.total_amount,
        "Order placed"
    );

    Ok(Json(order))
}

/// Get order by internal id
///
/// Only the order's customer, vendor, or assigned partner may read it.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    let is_participant = order.customer_id.to_string() == user.id
        || order.vendor_id.to_string() == user.id
        || order
            .delivery_partner_id
            .as_ref()
            .is_some_and(|p| p.to_string() == user.id);
    if !is_participant {
        return Err(AppError::forbidden("Not a participant in this order"));
    }

    Ok(Json(order))
}

/// List a vendor's orders, newest first
pub async fn list_for_vendor(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<VendorOrdersQuery>,
) -> AppResult<Json<Vec<Order>>> {
    user.require_role(Role::Vendor)?;
    if user.id != query.vendor_id {
        return Err(AppError::forbidden("Vendors can only list their own orders"));
    }

    let vendor_id = user.record_id()?;
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_by_vendor(&vendor_id).await?;
    Ok(Json(orders))
}

/// List a delivery partner's assigned orders, newest first
pub async fn list_for_partner(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PartnerOrdersQuery>,
) -> AppResult<Json<Vec<Order>>> {
    user.require_role(Role::Delivery)?;
    if user.id != query.partner_id {
        return Err(AppError::forbidden(
            "Delivery partners can only list their own orders",
        ));
    }

    let partner_id = user.record_id()?;
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo.find_by_partner(&partner_id).await?;
    Ok(Json(orders))
}

/// Track an order by its external id (public)
pub async fn track(
    State(state): State<ServerState>,
    Query(query): Query<TrackQuery>,
) -> AppResult<Json<Order>> {
    validate_required_text(&query.order_id, "order_id", MAX_ORDER_ID_LEN)?;
    let customer_filter = match &query.customer_id {
        Some(raw) => Some(
            raw.parse::<RecordId>()
                .map_err(|_| AppError::validation(format!("Invalid customer id: {}", raw)))?,
        ),
        None => None,
    };

    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_order_id(&query.order_id, customer_filter)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", query.order_id)))?;
    Ok(Json(order))
}

/// Accept a pending order (vendor)
pub async fn accept(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    apply_transition(&state, &user, &id, OrderStatus::Accepted).await
}

/// Reject a pending order (vendor)
pub async fn reject(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    apply_transition(&state, &user, &id, OrderStatus::Rejected).await
}

/// Generic status transition
///
/// The target must be in the closed status set; `Assigned` is refused here
/// because it must carry partner details through the assign endpoint.
pub async fn update_status(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> AppResult<Json<Order>> {
    let target: OrderStatus = req.status.parse().map_err(AppError::validation)?;
    if target == OrderStatus::Assigned {
        return Err(AppError::business_rule(
            "Use the assign endpoint to move an order to Assigned",
        ));
    }

    apply_transition(&state, &user, &id, target).await
}

/// Assign a delivery partner to a Ready order (vendor)
///
/// Partner reference and the Ready → Assigned move land in one atomic write.
pub async fn assign(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> AppResult<Json<Order>> {
    user.require_role(Role::Vendor)?;
    validate_required_text(
        &req.delivery_partner_name,
        "delivery_partner_name",
        MAX_NAME_LEN,
    )?;
    let partner_id: RecordId = req.delivery_partner_id.parse().map_err(|_| {
        AppError::validation(format!(
            "Invalid delivery partner id: {}",
            req.delivery_partner_id
        ))
    })?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;
    if order.vendor_id.to_string() != user.id {
        return Err(AppError::forbidden("Vendors can only assign their own orders"));
    }
    if order.status != OrderStatus::Ready {
        return Err(AppError::business_rule(format!(
            "Cannot assign order in status {}, it must be Ready",
            order.status
        )));
    }

    let record_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Order record missing id"))?;
    let updated = repo
        .assign(&record_id, partner_id, req.delivery_partner_name.clone())
        .await?;

    match updated {
        Some(order) => {
            tracing::info!(
                order_id = %order.order_id,
                partner = %req.delivery_partner_name,
                "Order assigned to delivery partner"
            );
            Ok(Json(order))
        }
        // CAS lost: someone moved the order between our read and the write
        None => match repo.find_by_id(&id).await? {
            Some(current) => Err(AppError::business_rule(format!(
                "Cannot assign order in status {}, it must be Ready",
                current.status
            ))),
            None => Err(AppError::not_found(format!("Order {} not found", id))),
        },
    }
}

/// Shared transition orchestration: lookup, authorization, precondition,
/// compare-and-set, and raced-write disambiguation.
async fn apply_transition(
    state: &ServerState,
    user: &CurrentUser,
    id: &str,
    target: OrderStatus,
) -> AppResult<Json<Order>> {
    let transition = transition_to(target)
        .ok_or_else(|| AppError::business_rule(format!("No transition leads to {}", target)))?;
    user.require_role(transition.actor)?;

    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {} not found", id)))?;

    check_ownership(&order, user, transition)?;

    if order.status != transition.from {
        return Err(AppError::business_rule(format!(
            "Cannot move order from {} to {}",
            order.status, target
        )));
    }

    let record_id = order
        .id
        .clone()
        .ok_or_else(|| AppError::internal("Order record missing id"))?;
    let updated = repo.transition(&record_id, transition, now_millis()).await?;

    match updated {
        Some(order) => {
            tracing::info!(
                order_id = %order.order_id,
                from = %transition.from,
                to = %transition.to,
                actor = %user.role,
                "Order transitioned"
            );
            Ok(Json(order))
        }
        // CAS lost: re-read to tell a raced transition from a vanished record
        None => match repo.find_by_id(id).await? {
            Some(current) => Err(AppError::business_rule(format!(
                "Cannot move order from {} to {}",
                current.status, target
            ))),
            None => Err(AppError::not_found(format!("Order {} not found", id))),
        },
    }
}

/// The acting role must also be the matching participant on this order
fn check_ownership(order: &Order, user: &CurrentUser, transition: &Transition) -> AppResult<()> {
    let owns = match transition.actor {
        Role::Vendor => order.vendor_id.to_string() == user.id,
        Role::Customer => order.customer_id.to_string() == user.id,
        Role::Delivery => order
            .delivery_partner_id
            .as_ref()
            .is_some_and(|p| p.to_string() == user.id),
    };

    if owns {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "Order {} does not belong to you",
            order.order_id
        )))
    }
}

fn validate_order_items(items: &[shared::client::OrderItem]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::validation("items must not be empty"));
    }
    if items.len() > MAX_ORDER_ITEMS {
        return Err(AppError::validation(format!(
            "too many items ({}, max {})",
            items.len(),
            MAX_ORDER_ITEMS
        )));
    }

    for item in items {
        validate_required_text(&item.name, "item name", MAX_NAME_LEN)?;
        validate_required_text(&item.shop_name, "item shop_name", MAX_NAME_LEN)?;
        validate_optional_text(&item.image, "item image", MAX_URL_LEN)?;
        if item.price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "item '{}' has a negative price",
                item.name
            )));
        }
        if item.quantity == 0 {
            return Err(AppError::validation(format!(
                "item '{}' has a zero quantity",
                item.name
            )));
        }
    }
    Ok(())
}

fn validate_delivery_address(address: &shared::client::DeliveryAddress) -> AppResult<()> {
    validate_required_text(&address.street, "street", MAX_ADDRESS_LEN)?;
    validate_required_text(&address.city, "city", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&address.state, "state", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&address.zip_code, "zip_code", MAX_SHORT_TEXT_LEN)?;
    validate_required_text(&address.phone, "phone", MAX_SHORT_TEXT_LEN)?;
    Ok(())
}
