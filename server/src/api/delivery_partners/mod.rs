//! Delivery Partner API
//!
//! 配送员相关接口: 可用配送员列表 (商家侧) 与可用状态切换 (配送员侧)。

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/delivery-partners", partner_routes())
}

fn partner_routes() -> Router<ServerState> {
    Router::new()
        .route("/available", get(handler::available))
        .route("/availability", put(handler::set_availability))
}
