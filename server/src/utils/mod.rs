//! 工具模块
//!
//! 应用错误 ([`AppError`] / [`AppResult`])、日志初始化和输入校验。

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResult};
