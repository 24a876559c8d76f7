//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查接口
//! - [`auth`] - 注册与登录接口
//! - [`shops`] - 店铺目录与实时流接口
//! - [`orders`] - 订单生命周期接口
//! - [`delivery_partners`] - 配送员接口

pub mod auth;
pub mod delivery_partners;
pub mod health;
pub mod orders;
pub mod shops;

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::AppResult;

/// HTTP 访问日志中间件, 记录方法、路径、状态码和耗时
async fn log_request(
    request: http::Request<axum::body::Body>,
    next: middleware::Next,
) -> http::Response<axum::body::Body> {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = std::time::Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        target: "http_access",
        "{} {} {} ({}ms)",
        method,
        uri,
        response.status(),
        started.elapsed().as_millis()
    );
    response
}

/// Build the Axum router (without state)
fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(shops::router())
        .merge(orders::router())
        .merge(delivery_partners::router())
}

/// Build the fully layered router, ready to serve
pub fn build_router(state: ServerState) -> Router {
    build_app()
        // JWT 认证中间件 - 在 Router 级别应用，require_auth 内部会跳过公共路由
        // 使用 from_fn_with_state 以便中间件可以访问 ServerState
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        // Tower HTTP 中间件
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        // HTTP 请求日志中间件
        .layer(middleware::from_fn(log_request))
}
