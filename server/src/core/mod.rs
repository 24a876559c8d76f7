//! 核心模块 - 配置加载、共享状态与 HTTP 服务器的生命周期
//!
//! [`Config`] 读取环境变量, [`ServerState`] 聚合数据库与各服务句柄,
//! [`Server`] 负责监听与优雅关闭, 启动期错误统一走 [`ServerError`]。

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
