//! Repository Module
//!
//! Typed access to the `account` and `order` tables.

pub mod account;
pub mod order;

// Re-exports
pub use account::AccountRepository;
pub use order::OrderRepository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
///
/// 查询未命中不算错误, 仓储返回 `Option`, 由调用方决定语义。
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("database: {0}")]
    Database(String),

    #[error("validation: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// 仓储错误到 HTTP 层错误的映射, 处理函数直接用 `?` 上抛
impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
            RepoError::Validation(msg) => AppError::Validation(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// ID 约定: 全栈统一 "table:id" 字符串, 解析成 surrealdb::RecordId 后
// 直接交给 select/update 等 CRUD 调用, 不做手工前缀拼接。

/// 各仓储共享的数据库句柄
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
