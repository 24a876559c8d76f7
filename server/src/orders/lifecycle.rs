//! Order lifecycle engine
//!
//! The single source of truth for which status an order may move to next,
//! which role may trigger the move, and which timestamp column the move
//! stamps. Handlers consult this table before any write; the order
//! repository re-checks the `from` status inside the update statement, so a
//! racing caller loses cleanly instead of clobbering state.

use crate::db::models::{OrderStatus, Role};

/// Timestamp column stamped when a transition fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StampField {
    AcceptedAt,
    PreparingAt,
    ReadyAt,
    PickedUpAt,
    DeliveredAt,
}

impl StampField {
    /// Column name in the order table
    pub fn column(&self) -> &'static str {
        match self {
            StampField::AcceptedAt => "accepted_at",
            StampField::PreparingAt => "preparing_at",
            StampField::ReadyAt => "ready_at",
            StampField::PickedUpAt => "picked_up_at",
            StampField::DeliveredAt => "delivered_at",
        }
    }
}

/// A single legal move in the order state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub actor: Role,
    pub stamps: Option<StampField>,
}

/// The full transition table
///
/// Every reachable status appears exactly once as a target; `Pending` is
/// only ever the creation state.
pub const TRANSITIONS: &[Transition] = &[
    Transition {
        from: OrderStatus::Pending,
        to: OrderStatus::Accepted,
        actor: Role::Vendor,
        stamps: Some(StampField::AcceptedAt),
    },
    Transition {
        from: OrderStatus::Pending,
        to: OrderStatus::Rejected,
        actor: Role::Vendor,
        stamps: None,
    },
    Transition {
        from: OrderStatus::Pending,
        to: OrderStatus::Cancelled,
        actor: Role::Customer,
        stamps: None,
    },
    Transition {
        from: OrderStatus::Accepted,
        to: OrderStatus::Preparing,
        actor: Role::Vendor,
        stamps: Some(StampField::PreparingAt),
    },
    Transition {
        from: OrderStatus::Preparing,
        to: OrderStatus::Ready,
        actor: Role::Vendor,
        stamps: Some(StampField::ReadyAt),
    },
    Transition {
        from: OrderStatus::Ready,
        to: OrderStatus::Assigned,
        actor: Role::Vendor,
        stamps: None,
    },
    Transition {
        from: OrderStatus::Assigned,
        to: OrderStatus::PickedUp,
        actor: Role::Delivery,
        stamps: Some(StampField::PickedUpAt),
    },
    Transition {
        from: OrderStatus::PickedUp,
        to: OrderStatus::OnTheWay,
        actor: Role::Delivery,
        stamps: None,
    },
    Transition {
        from: OrderStatus::OnTheWay,
        to: OrderStatus::Delivered,
        actor: Role::Delivery,
        stamps: Some(StampField::DeliveredAt),
    },
];

/// Look up the transition that lands on `target`
///
/// Returns `None` for `Pending` (creation-only). `Assigned` has a row, but
/// the status endpoint refuses it - assignment must carry the partner
/// reference in the same write, so it goes through [`assign_transition`].
pub fn transition_to(target: OrderStatus) -> Option<&'static Transition> {
    TRANSITIONS.iter().find(|t| t.to == target)
}

/// The assignment move (Ready → Assigned), vendor-triggered
pub fn assign_transition() -> &'static Transition {
    TRANSITIONS
        .iter()
        .find(|t| t.to == OrderStatus::Assigned)
        .expect("transition table carries the Assigned row")
}

/// Whether `from` → `to` is a legal move for some actor
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    TRANSITIONS.iter().any(|t| t.from == from && t.to == to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_is_fully_connected() {
        let path = [
            OrderStatus::Pending,
            OrderStatus::Accepted,
            OrderStatus::Preparing,
            OrderStatus::Ready,
            OrderStatus::Assigned,
            OrderStatus::PickedUp,
            OrderStatus::OnTheWay,
            OrderStatus::Delivered,
        ];
        for pair in path.windows(2) {
            assert!(
                can_transition(pair[0], pair[1]),
                "expected {} -> {} to be legal",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn terminal_states_have_no_outgoing_moves() {
        for terminal in [
            OrderStatus::Rejected,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert!(terminal.is_terminal());
            assert!(
                TRANSITIONS.iter().all(|t| t.from != terminal),
                "{terminal} must not have outgoing transitions"
            );
        }
    }

    #[test]
    fn pending_is_creation_only() {
        assert!(transition_to(OrderStatus::Pending).is_none());
        assert!(TRANSITIONS.iter().all(|t| t.to != OrderStatus::Pending));
    }

    #[test]
    fn every_target_has_exactly_one_row() {
        for t in TRANSITIONS {
            let count = TRANSITIONS.iter().filter(|u| u.to == t.to).count();
            assert_eq!(count, 1, "{} reachable via {} rows", t.to, count);
        }
    }

    #[test]
    fn vendor_drives_preparation_and_delivery_drives_transport() {
        assert_eq!(
            transition_to(OrderStatus::Accepted).unwrap().actor,
            Role::Vendor
        );
        assert_eq!(
            transition_to(OrderStatus::Rejected).unwrap().actor,
            Role::Vendor
        );
        assert_eq!(
            transition_to(OrderStatus::Preparing).unwrap().actor,
            Role::Vendor
        );
        assert_eq!(
            transition_to(OrderStatus::Ready).unwrap().actor,
            Role::Vendor
        );
        assert_eq!(
            transition_to(OrderStatus::PickedUp).unwrap().actor,
            Role::Delivery
        );
        assert_eq!(
            transition_to(OrderStatus::OnTheWay).unwrap().actor,
            Role::Delivery
        );
        assert_eq!(
            transition_to(OrderStatus::Delivered).unwrap().actor,
            Role::Delivery
        );
        assert_eq!(
            transition_to(OrderStatus::Cancelled).unwrap().actor,
            Role::Customer
        );
    }

    #[test]
    fn assignment_row_is_vendor_from_ready() {
        let assign = assign_transition();
        assert_eq!(assign.from, OrderStatus::Ready);
        assert_eq!(assign.to, OrderStatus::Assigned);
        assert_eq!(assign.actor, Role::Vendor);
        assert!(assign.stamps.is_none());
    }

    #[test]
    fn stamped_columns_match_their_transition() {
        let stamped: Vec<_> = TRANSITIONS
            .iter()
            .filter_map(|t| t.stamps.map(|s| (t.to, s.column())))
            .collect();
        assert_eq!(
            stamped,
            vec![
                (OrderStatus::Accepted, "accepted_at"),
                (OrderStatus::Preparing, "preparing_at"),
                (OrderStatus::Ready, "ready_at"),
                (OrderStatus::PickedUp, "picked_up_at"),
                (OrderStatus::Delivered, "delivered_at"),
            ]
        );
    }

    #[test]
    fn skipping_a_step_is_illegal() {
        assert!(!can_transition(OrderStatus::Pending, OrderStatus::Ready));
        assert!(!can_transition(OrderStatus::Accepted, OrderStatus::Delivered));
        assert!(!can_transition(OrderStatus::Ready, OrderStatus::PickedUp));
        assert!(!can_transition(OrderStatus::Assigned, OrderStatus::Delivered));
    }
}
