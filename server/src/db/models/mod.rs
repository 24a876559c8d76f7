//! 数据模型
//!
//! `account` 一张表承载三种角色, `order` 记录订单全程,
//! `serde_helpers` 处理 RecordId 的字符串收发。

pub mod account;
pub mod order;
pub mod serde_helpers;

pub use account::{Account, AccountCreate, AccountId, Role};
pub use order::{Order, OrderCreate, OrderId, OrderStatus, PaymentStatus};
