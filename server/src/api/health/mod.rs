//! Health check endpoints
//!
//! `/health` 为轻量存活检查, `/health/detailed` 附带数据库延迟与广播订阅数。
//! 两条路由都在 `/api` 前缀之外, 认证中间件不会拦截。

use std::time::Instant;

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/detailed", get(health_detailed))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "voltmart-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health_detailed(State(state): State<ServerState>) -> Json<serde_json::Value> {
    let started = Instant::now();
    let db_ok = state.db.health().await.is_ok();
    let db_latency_ms = started.elapsed().as_millis() as u64;

    Json(serde_json::json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "service": "voltmart-server",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.uptime_seconds(),
        "database": {
            "healthy": db_ok,
            "latency_ms": db_latency_ms,
        },
        "shop_stream_subscribers": state.shop_broadcast.subscriber_count(),
    }))
}
