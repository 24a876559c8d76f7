//! 统一错误处理
//!
//! [`AppError`] 覆盖从认证到数据库的所有失败情形, 经 `IntoResponse`
//! 统一转换为 `{code, message}` 信封。
//!
//! # 错误码
//!
//! | 前缀 | 分类 |
//! |------|------|
//! | E0xxx | 业务与校验错误 |
//! | E2xxx | 权限错误 |
//! | E3xxx | 令牌错误 |
//! | E9xxx | 系统错误 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shared::ApiResponse;
use tracing::error;

/// Application-level Result type
///
/// Used in HTTP handlers and application logic
pub type AppResult<T> = Result<T, AppError>;

/// 应用错误
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 请求格式或字段不合法 (400, E0002)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// 无效请求, 校验之外的 400 (E0006)
    #[error("Invalid request: {0}")]
    Invalid(String),

    /// 未携带有效凭证 (401, E3001)
    #[error("Authentication required")]
    Unauthorized,

    /// 令牌已过期 (401, E3003)
    #[error("Token expired")]
    TokenExpired,

    /// 令牌无效, 细节只进日志 (401, E3002)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// 角色或归属不符 (403, E2001)
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// 资源不存在 (404, E0003)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// 唯一约束冲突 (409, E0004)
    #[error("Resource already exists: {0}")]
    Conflict(String),

    /// 业务规则不允许 (422, E0005)
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// 数据库失败, 细节只进日志 (500, E9002)
    #[error("Database error: {0}")]
    Database(String),

    /// 其他内部失败, 细节只进日志 (500, E9001)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// 对外响应的 (状态码, 错误码, 消息)
    ///
    /// 5xx 与令牌错误返回固定消息, 其余错误原样透出。
    fn response_parts(&self) -> (StatusCode, &'static str, &str) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E3001", "Please login first"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E3003", "Token expired"),
            AppError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "E3002", "Invalid token"),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.as_str()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.as_str()),
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error"),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "E9001",
                "Internal server error",
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // 系统错误的细节留在日志里, 不上线
        match &self {
            AppError::Database(detail) => {
                error!(target: "database", error = %detail, "Database error occurred");
            }
            AppError::Internal(detail) => {
                error!(target: "internal", error = %detail, "Internal error occurred");
            }
            _ => {}
        }

        let (status, code, message) = self.response_parts();
        let body = Json(ApiResponse::<()>::error(code, message));
        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token(detail: impl Into<String>) -> Self {
        Self::InvalidToken(detail.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }

    pub fn conflict(resource: impl Into<String>) -> Self {
        Self::Conflict(resource.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// 登录失败的统一提示, 不区分邮箱不存在和密码错误
    pub fn invalid_credentials() -> Self {
        Self::Invalid("Invalid email or password".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_map_to_expected_status() {
        let cases = [
            (AppError::unauthorized(), StatusCode::UNAUTHORIZED),
            (AppError::token_expired(), StatusCode::UNAUTHORIZED),
            (AppError::invalid_token("bad header"), StatusCode::UNAUTHORIZED),
            (AppError::forbidden("x"), StatusCode::FORBIDDEN),
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::validation("x"), StatusCode::BAD_REQUEST),
            (AppError::business_rule("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::database("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::invalid("x"), StatusCode::BAD_REQUEST),
        ];

        for (err, expected) in cases {
            let resp = err.into_response();
            assert_eq!(resp.status(), expected);
        }
    }

    #[test]
    fn sensitive_details_stay_off_the_wire() {
        let (_, code, message) = AppError::database("rocksdb: io stall").response_parts();
        assert_eq!(code, "E9002");
        assert_eq!(message, "Database error");

        let (_, code, message) = AppError::invalid_token("kid mismatch").response_parts();
        assert_eq!(code, "E3002");
        assert_eq!(message, "Invalid token");
    }

    #[test]
    fn invalid_credentials_has_uniform_message() {
        let err = AppError::invalid_credentials();
        assert_eq!(err.to_string(), "Invalid request: Invalid email or password");
    }
}
