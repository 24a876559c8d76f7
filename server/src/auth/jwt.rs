//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use crate::db::models::Role;
use crate::utils::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use thiserror::Error;

/// 密钥最小长度 (字节)
const MIN_SECRET_LEN: usize = 32;

/// 令牌默认有效期: 7 天
const DEFAULT_EXPIRATION_MINUTES: i64 = 10080;

/// JWT 签发参数
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HS256 密钥, 不少于 [`MIN_SECRET_LEN`] 字节
    pub secret: String,
    /// 有效期 (分钟)
    pub expiration_minutes: i64,
    /// `iss` 声明
    pub issuer: String,
    /// `aud` 声明
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let expiration_minutes = std::env::var("JWT_EXPIRATION_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EXPIRATION_MINUTES);

        Self {
            secret: load_jwt_secret().unwrap_or_else(emergency_secret),
            expiration_minutes,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "voltmart-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "voltmart-clients".to_string()),
        }
    }
}

/// 密钥不可用时的兜底: debug 给出固定的开发密钥, release 直接终止进程
#[cfg(debug_assertions)]
fn emergency_secret(e: JwtError) -> String {
    tracing::warn!("JWT secret unavailable ({}), using emergency dev key", e);
    "voltmart-dev-only-emergency-key-do-not-deploy!".to_string()
}

#[cfg(not(debug_assertions))]
fn emergency_secret(e: JwtError) -> String {
    panic!("refusing to start without a usable JWT_SECRET: {}", e);
}

/// 令牌负载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 账户记录 ID ("account:..." 形式)
    pub sub: String,
    /// 账户邮箱
    pub email: String,
    /// 账户显示名
    pub name: String,
    /// 账户角色 (customer / vendor / delivery)
    pub role: String,
    /// 令牌类型, 目前只有 "access"
    pub token_type: String,
    /// 过期时刻, Unix 秒
    pub exp: i64,
    /// 签发时刻, Unix 秒
    pub iat: i64,
    /// 签发方标识
    pub iss: String,
    /// 目标受众
    pub aud: String,
}

/// JWT 错误
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("令牌无效: {0}")]
    InvalidToken(String),

    #[error("令牌过期")]
    ExpiredToken,

    #[error("签名校验失败")]
    InvalidSignature,

    #[error("签发失败: {0}")]
    GenerationFailed(String),

    #[error("密钥配置错误: {0}")]
    ConfigError(String),
}

/// 随机生成一个可打印的开发用密钥 (64 字符)
pub fn generate_dev_jwt_secret() -> String {
    const ALPHABET: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut raw = [0u8; 64];
    if rng.fill(&mut raw).is_err() {
        // 随机源不可用时退回固定的开发密钥
        return "VoltMartServerDevelopmentSecureKey2025!".to_string();
    }

    raw.iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()] as char)
        .collect()
}

/// 从环境变量加载 JWT 密钥
///
/// debug 构建缺失时退回随机开发密钥, release 构建直接报错。
fn load_jwt_secret() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= MIN_SECRET_LEN => Ok(secret),
        Ok(_) => Err(JwtError::ConfigError(format!(
            "JWT_SECRET must be at least {} characters long",
            MIN_SECRET_LEN
        ))),
        Err(_) => {
            #[cfg(debug_assertions)]
            {
                tracing::warn!("⚠️  JWT_SECRET 未设置, 开发构建改用随机临时密钥");
                Ok(generate_dev_jwt_secret())
            }
            #[cfg(not(debug_assertions))]
            {
                Err(JwtError::ConfigError(
                    "release builds require JWT_SECRET to be set".to_string(),
                ))
            }
        }
    }
}

/// 令牌签发与校验服务
///
/// 编码/解码密钥在构造时派生一次, Clone 开销低。
#[derive(Debug, Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub config: JwtConfig,
}

impl JwtService {
    /// 按环境变量配置构造
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 按给定配置构造
    pub fn with_config(config: JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            config,
        }
    }

    /// 为账户签发访问令牌
    pub fn generate_token(
        &self,
        account_id: &str,
        email: &str,
        name: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let issued_at = Utc::now();
        let expires_at = issued_at + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: role.as_str().to_string(),
            token_type: "access".to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 校验令牌并返回负载
    ///
    /// 校验签名、过期时间、iss 和 aud。
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("token rejected: {}", e)),
            }
        })?;

        Ok(data.claims)
    }

    /// 从 `Authorization` 头取出 Bearer 令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 已认证的请求主体
///
/// 认证中间件校验令牌后构造, 经请求扩展传给处理函数。
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 账户记录 ID ("account:..." 形式)
    pub id: String,
    /// 账户邮箱
    pub email: String,
    /// 账户显示名
    pub name: String,
    /// 账户角色
    pub role: Role,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let role: Role = claims
            .role
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("unknown role '{}'", claims.role)))?;

        Ok(Self {
            id: claims.sub,
            email: claims.email,
            name: claims.name,
            role,
        })
    }
}

impl CurrentUser {
    /// 要求指定角色，否则返回 403
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "This action requires the {} role",
                role
            )))
        }
    }

    /// 解析账户记录 ID
    pub fn record_id(&self) -> Result<RecordId, AppError> {
        self.id
            .parse()
            .map_err(|_| AppError::InvalidToken("Malformed subject in token".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-that-is-long-enough!".to_string(),
            expiration_minutes: 60,
            issuer: "voltmart-server".to_string(),
            audience: "voltmart-clients".to_string(),
        }
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = JwtService::with_config(test_config());

        let token = service
            .generate_token("account:abc123", "jane@example.com", "Jane", Role::Vendor)
            .expect("Failed to generate test token");

        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        assert_eq!(claims.sub, "account:abc123");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.name, "Jane");
        assert_eq!(claims.role, "vendor");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = JwtConfig {
            expiration_minutes: -10,
            ..test_config()
        };
        let service = JwtService::with_config(config);

        let token = service
            .generate_token("account:abc123", "jane@example.com", "Jane", Role::Customer)
            .expect("Failed to generate test token");

        match service.validate_token(&token) {
            Err(JwtError::ExpiredToken) => {}
            other => panic!("expected ExpiredToken, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let service = JwtService::with_config(test_config());
        let other = JwtService::with_config(JwtConfig {
            audience: "someone-else".to_string(),
            ..test_config()
        });

        let token = service
            .generate_token("account:abc123", "jane@example.com", "Jane", Role::Delivery)
            .expect("Failed to generate test token");

        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_current_user_from_claims() {
        let service = JwtService::with_config(test_config());
        let token = service
            .generate_token("account:abc123", "jane@example.com", "Jane", Role::Delivery)
            .expect("Failed to generate test token");
        let claims = service
            .validate_token(&token)
            .expect("Failed to validate test token");

        let user = CurrentUser::try_from(claims).expect("Failed to build current user");
        assert_eq!(user.role, Role::Delivery);
        assert_eq!(user.id, "account:abc123");
        assert!(user.require_role(Role::Delivery).is_ok());
        assert!(user.require_role(Role::Vendor).is_err());
    }

    #[test]
    fn test_unknown_role_in_claims_rejected() {
        let claims = Claims {
            sub: "account:abc123".to_string(),
            email: "jane@example.com".to_string(),
            name: "Jane".to_string(),
            role: "superuser".to_string(),
            token_type: "access".to_string(),
            exp: 0,
            iat: 0,
            iss: "voltmart-server".to_string(),
            aud: "voltmart-clients".to_string(),
        };
        assert!(CurrentUser::try_from(claims).is_err());
    }

    #[test]
    fn test_dev_key_generation() {
        let key1 = generate_dev_jwt_secret();
        let key2 = generate_dev_jwt_secret();

        // Keys should be different (high probability)
        assert_ne!(key1, key2);

        assert_eq!(key1.len(), 64);
        assert!(key1.is_ascii());
    }
}
