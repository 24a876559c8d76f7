//! 店铺广播总线
//!
//! # 消息流
//!
//! ```text
//! Vendor signup ──▶ publish() ──▶ broadcast::Sender<ShopEvent>
//!                                        │
//!                             ┌──────────┴──────────┐
//!                             ▼                     ▼
//!                       SSE stream #1         SSE stream #2
//! ```
//!
//! 订阅者通过 [`ShopBroadcast::subscribe`] 获得接收端和一个注册守卫；
//! 守卫在 Drop 时注销订阅，重复注销是幂等的。

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use shared::client::ShopEvent;
use shared::util::now_millis;
use tokio::sync::broadcast;

/// Capacity of the shop event channel; slow consumers past this lag
/// are dropped by the broadcast channel, not by us
const SHOP_CHANNEL_CAPACITY: usize = 64;

/// 店铺广播 - 新店铺上线的扇出通道
///
/// # 职责
///
/// - 事件发布 (publish, best-effort, 无订阅者时静默丢弃)
/// - 订阅管理 (subscribe / SubscriberGuard 注销)
#[derive(Debug)]
pub struct ShopBroadcast {
    /// 服务器到订阅者的广播通道
    tx: broadcast::Sender<ShopEvent>,
    /// 活跃订阅者 (订阅 ID -> 订阅时间戳 ms)
    subscribers: Arc<DashMap<u64, i64>>,
    /// 订阅 ID 分配器
    next_id: AtomicU64,
}

impl ShopBroadcast {
    /// 创建默认容量的广播总线
    pub fn new() -> Self {
        Self::with_capacity(SHOP_CHANNEL_CAPACITY)
    }

    /// 创建指定容量的广播总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            subscribers: Arc::new(DashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// 订阅店铺事件
    ///
    /// 返回的守卫离开作用域时自动注销；接收端跟随 broadcast 通道语义。
    pub fn subscribe(&self) -> (SubscriberGuard, broadcast::Receiver<ShopEvent>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.insert(id, now_millis());
        tracing::debug!(subscriber = id, "Shop stream subscriber joined");

        let guard = SubscriberGuard {
            id,
            subscribers: self.subscribers.clone(),
        };
        (guard, self.tx.subscribe())
    }

    /// 发布店铺事件 (best-effort)
    ///
    /// 返回收到事件的订阅者数量；没有订阅者时返回 0 而非错误。
    pub fn publish(&self, event: &ShopEvent) -> usize {
        match self.tx.send(event.clone()) {
            Ok(receivers) => {
                tracing::debug!(
                    shop = %event.name,
                    receivers,
                    "Shop event published"
                );
                receivers
            }
            Err(_) => 0,
        }
    }

    /// 当前活跃订阅者数量
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for ShopBroadcast {
    fn default() -> Self {
        Self::new()
    }
}

/// 订阅守卫 - Drop 时注销订阅
///
/// 注销是幂等的：守卫只注销自己的 ID，重复移除是无害的空操作。
#[derive(Debug)]
pub struct SubscriberGuard {
    id: u64,
    subscribers: Arc<DashMap<u64, i64>>,
}

impl SubscriberGuard {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        self.subscribers.remove(&self.id);
        tracing::debug!(subscriber = self.id, "Shop stream subscriber left");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_event(name: &str) -> ShopEvent {
        ShopEvent {
            vendor_id: "account:v1".to_string(),
            name: name.to_string(),
            address: "12 Ohm Street".to_string(),
            eta: "15 mins".to_string(),
        }
    }

    #[tokio::test]
    async fn publish_reaches_all_subscribers() {
        let bus = ShopBroadcast::new();
        let (_g1, mut rx1) = bus.subscribe();
        let (_g2, mut rx2) = bus.subscribe();

        let delivered = bus.publish(&sample_event("Volt Depot"));
        assert_eq!(delivered, 2);

        assert_eq!(rx1.recv().await.unwrap().name, "Volt Depot");
        assert_eq!(rx2.recv().await.unwrap().name, "Volt Depot");
    }

    #[tokio::test]
    async fn dropped_subscriber_does_not_break_others() {
        let bus = ShopBroadcast::new();
        let (g1, rx1) = bus.subscribe();
        let (_g2, mut rx2) = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        drop(g1);
        assert_eq!(bus.subscriber_count(), 1);

        bus.publish(&sample_event("Ampere Annex"));
        assert_eq!(rx2.recv().await.unwrap().name, "Ampere Annex");
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = ShopBroadcast::new();
        assert_eq!(bus.publish(&sample_event("Lonely Shop")), 0);
    }

    #[tokio::test]
    async fn subscriber_ids_are_unique() {
        let bus = ShopBroadcast::new();
        let (g1, _rx1) = bus.subscribe();
        let (g2, _rx2) = bus.subscribe();
        assert_ne!(g1.id(), g2.id());
    }
}
