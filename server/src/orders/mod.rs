//! 订单领域逻辑
//!
//! - [`lifecycle`] - 订单状态机（转换表、角色、时间戳）

pub mod lifecycle;

pub use lifecycle::{StampField, Transition, assign_transition, can_transition, transition_to};
