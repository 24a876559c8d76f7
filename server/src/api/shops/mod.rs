//! Shop API 模块
//!
//! 店铺目录快照与 SSE 实时流, 两条路由都不要求登录。

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/shops", shop_routes())
}

fn shop_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/stream", get(handler::stream))
}
