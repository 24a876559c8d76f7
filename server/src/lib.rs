//! VoltMart Server - 电子元件市场的多角色服务端
//!
//! 单二进制, 内嵌数据库, 按角色划分的 REST API。各子系统:
//!
//! - `core`: 配置加载、共享状态、HTTP 服务器生命周期
//! - `auth`: JWT 签发与校验, Argon2 口令散列, 三种账号角色
//! - `api`: 路由与处理器, 统一错误封包
//! - `db`: 嵌入式 SurrealDB 的模型与仓储
//! - `orders`: 订单状态机与流转规则
//! - `message`: 新店铺上线的实时广播 (SSE)
//! - `utils`: 错误类型、日志、输入校验
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、当前用户
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (模型与仓储)
//! ├── message/       # 店铺广播总线
//! ├── orders/        # 订单生命周期
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod message;
pub mod orders;
pub mod utils;

// 顶层 re-export, 下游按 `voltmart_server::X` 取常用类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use message::ShopBroadcast;
pub use shared::response::ApiResponse;
pub use utils::logger::{init_logger, init_logger_with_file};
pub use utils::{AppError, AppResult};

// Security logging macro - 认证相关事件统一打到 security target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr $(, $key:ident = $value:expr)* $(,)?) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event
            $(, $key = $value)*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
 _    __      ____  __  ___           __
| |  / /___  / / /_/  |/  /___ ______/ /_
| | / / __ \/ / __/ /|_/ / __ `/ ___/ __/
| |/ / /_/ / / /_/ /  / / /_/ / /  / /_
|___/\____/_/\__/_/  /_/\__,_/_/   \__/
    "#
    );
}
