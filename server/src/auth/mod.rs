//! 认证授权模块
//!
//! 令牌的签发与校验在 [`JwtService`], 已认证的请求主体是
//! [`CurrentUser`], 路由层的统一拦截由 [`require_auth`] 完成。

pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
