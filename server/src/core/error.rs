use crate::utils::AppError;
use thiserror::Error;

/// 启动阶段的错误 (目录创建、数据库打开、端口绑定)。
/// 请求处理期的错误一律走 [`AppError`], 不经过这里。
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("应用层: {0}")]
    App(#[from] AppError),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;
