//! 认证中间件
//!
//! 校验 Bearer 令牌并把 [`CurrentUser`] 注入请求扩展

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// 无需令牌即可访问的 API 路径
const PUBLIC_API_ROUTES: &[&str] = &[
    "/api/auth/signup",
    "/api/auth/login",
    "/api/shops",
    "/api/shops/stream",
    "/api/orders/track",
];

fn is_public_api_route(path: &str) -> bool {
    PUBLIC_API_ROUTES.contains(&path)
}

/// 认证中间件
///
/// 从 `Authorization: Bearer <token>` 头提取并验证 JWT,
/// 成功后将 [`CurrentUser`] 写入请求扩展供处理函数读取。
///
/// # 跳过认证的请求
///
/// - `OPTIONS *` (CORS 预检)
/// - 非 `/api/` 路径 (健康检查等)
/// - [`PUBLIC_API_ROUTES`] 中列出的公开接口
///
/// # 错误
///
/// | 情况 | 结果 |
/// |------|------|
/// | 缺少 Authorization 头 | 401 Unauthorized |
/// | 令牌过期 | 401 TokenExpired |
/// | 令牌无效 | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || is_public_api_route(path)
    {
        return Ok(next.run(req).await);
    }

    let Some(auth_header) = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    else {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
        return Err(AppError::unauthorized());
    };

    let token = JwtService::extract_from_header(auth_header)
        .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?;

    let claims = state.get_jwt_service().validate_token(token).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", req.uri())
        );
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    // 角色字符串非法的令牌按无效令牌处理
    let user = CurrentUser::try_from(claims).map_err(|e| {
        security_log!(
            "WARN",
            "auth_failed",
            error = format!("{}", e),
            uri = format!("{:?}", req.uri())
        );
        AppError::invalid_token("Invalid token")
    })?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
