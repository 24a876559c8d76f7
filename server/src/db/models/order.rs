//! Order Model

use super::AccountId;
use super::serde_helpers;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::client::{DeliveryAddress, OrderItem};
use std::fmt;
use std::str::FromStr;
use surrealdb::RecordId;

/// Order ID type (internal record id; the external `order_id` is a string)
pub type OrderId = RecordId;

/// Order status, closed set
///
/// Happy path: Pending → Accepted → Preparing → Ready → Assigned →
/// Picked Up → On the Way → Delivered. Rejected, Cancelled and Delivered
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Accepted,
    Rejected,
    Preparing,
    Ready,
    Assigned,
    #[serde(rename = "Picked Up")]
    PickedUp,
    #[serde(rename = "On the Way")]
    OnTheWay,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Accepted => "Accepted",
            OrderStatus::Rejected => "Rejected",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Assigned => "Assigned",
            OrderStatus::PickedUp => "Picked Up",
            OrderStatus::OnTheWay => "On the Way",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Terminal states have no outgoing transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Rejected | OrderStatus::Delivered | OrderStatus::Cancelled
        )
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Accepted" => Ok(OrderStatus::Accepted),
            "Rejected" => Ok(OrderStatus::Rejected),
            "Preparing" => Ok(OrderStatus::Preparing),
            "Ready" => Ok(OrderStatus::Ready),
            "Assigned" => Ok(OrderStatus::Assigned),
            "Picked Up" => Ok(OrderStatus::PickedUp),
            "On the Way" => Ok(OrderStatus::OnTheWay),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment state, carried on the order but with no transition surface yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

/// Order model matching the SurrealDB schema
///
/// Customer, vendor and partner references are by-value snapshots taken at
/// write time; later account edits do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    /// Externally visible identifier, client-generated, unique
    pub order_id: String,

    #[serde(with = "serde_helpers::record_id")]
    pub customer_id: AccountId,
    pub customer_email: String,
    pub customer_name: String,

    #[serde(with = "serde_helpers::record_id")]
    pub vendor_id: AccountId,
    pub shop_name: String,

    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub delivery_address: DeliveryAddress,

    pub payment_method: String,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor_notes: Option<String>,

    pub status: OrderStatus,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub delivery_partner_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_partner_name: Option<String>,

    pub placed_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparing_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picked_up_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivered_at: Option<i64>,
}

impl Order {
    /// Record id as "order:..." string, empty when not yet persisted
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|t| t.to_string()).unwrap_or_default()
    }
}

/// Create order payload, already validated and vendor-resolved
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub order_id: String,
    pub customer_id: AccountId,
    pub customer_email: String,
    pub customer_name: String,
    pub vendor_id: AccountId,
    pub shop_name: String,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub delivery_address: DeliveryAddress,
    pub payment_method: String,
    pub customer_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_strings_match_wire_format() {
        assert_eq!(OrderStatus::PickedUp.as_str(), "Picked Up");
        assert_eq!(OrderStatus::OnTheWay.as_str(), "On the Way");
        assert_eq!(
            serde_json::to_string(&OrderStatus::PickedUp).unwrap(),
            "\"Picked Up\""
        );
    }

    #[test]
    fn status_round_trips_through_from_str() {
        let all = [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Rejected,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Assigned,
            OrderStatus::PickedUp,
            OrderStatus::OnTheWay,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ];
        for status in all {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(OrderStatus::Rejected.is_terminal());
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Assigned.is_terminal());
    }

    #[test]
    fn payment_status_defaults_to_pending() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }
}
