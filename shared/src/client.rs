//! Client-facing API types
//!
//! Request/response types used in API communication. These are shared
//! between the server and client crates so both sides agree on the wire
//! format.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Auth
// =============================================================================

/// Signup request
///
/// `shop_name`/`shop_address`/`delivery_radius_km` are vendor-only fields,
/// `vehicle_type` is delivery-only; the server rejects missing role fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// One of `customer`, `vendor`, `delivery`
    pub role: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_radius_km: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Auth response (signup and login)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub account: AccountInfo,
}

/// Account information, credential stripped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    pub email: String,
    pub role: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shop_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_radius_km: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    pub is_available: bool,
    pub created_at: i64,
}

// =============================================================================
// Orders
// =============================================================================

/// A single ordered line item
///
/// Stored on the order as a by-value snapshot; `shop_name` is the vendor
/// shop the item came from (the first item's shop resolves the whole order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub shop_name: String,
}

/// Delivery address snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
}

/// Create order request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Externally visible order identifier, generated by the client
    pub order_id: String,
    /// Account id of the ordering customer (`account:...`)
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub delivery_address: DeliveryAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_notes: Option<String>,
}

/// Generic status transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Delivery partner assignment request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignRequest {
    pub delivery_partner_id: String,
    pub delivery_partner_name: String,
}

// =============================================================================
// Delivery partners
// =============================================================================

/// Availability toggle request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub is_available: bool,
}

/// Delivery partner summary for the assignment picker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    pub is_available: bool,
}

// =============================================================================
// Shops
// =============================================================================

/// Shop summary returned by the snapshot endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopSummary {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Display-only delivery estimate, e.g. "15 mins"
    pub eta: String,
}

/// Shop onboarding event fanned out on the broadcast stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopEvent {
    pub vendor_id: String,
    pub name: String,
    pub address: String,
    pub eta: String,
}
