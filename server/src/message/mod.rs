//! 消息模块
//!
//! 店铺上线事件的进程内扇出：
//! - [`ShopBroadcast`] - 广播总线
//! - [`SubscriberGuard`] - 订阅注销守卫

pub mod bus;

pub use bus::{ShopBroadcast, SubscriberGuard};
