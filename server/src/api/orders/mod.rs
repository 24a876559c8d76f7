//! Order API 模块
//!
//! 下单、查询与生命周期动作。`/track` 是唯一的公开路由。

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", order_routes())
}

fn order_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create))
        // 静态段在 {id} 捕获之前匹配
        .route("/vendor", get(handler::list_for_vendor))
        .route("/delivery-partner", get(handler::list_for_partner))
        .route("/track", get(handler::track))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/accept", post(handler::accept))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/assign", post(handler::assign))
}
