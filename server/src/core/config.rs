use std::path::PathBuf;
use std::str::FromStr;

use crate::auth::JwtConfig;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

/// 服务器配置
///
/// 每一项都可以用环境变量覆盖 (.env 文件在 main 里先加载):
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/voltmart | 数据库和日志的根目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SHUTDOWN_TIMEOUT_MS | 10000 | 优雅关闭排水窗口(毫秒) |
/// | JWT_SECRET | (开发环境自动生成) | JWT 密钥 |
/// | JWT_EXPIRATION_MINUTES | 10080 | 令牌有效期(分钟) |
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录, 其下存放 database/ 与 logs/
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 优雅关闭排水窗口 (毫秒)
    pub shutdown_timeout_ms: u64,
}

impl Config {
    /// 从环境变量加载, 未设置的项取默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: env_or("WORK_DIR", "/var/lib/voltmart"),
            http_port: env_parse("HTTP_PORT", 3000),
            jwt: JwtConfig::default(),
            environment: env_or("ENVIRONMENT", "development"),
            shutdown_timeout_ms: env_parse("SHUTDOWN_TIMEOUT_MS", 10000),
        }
    }

    /// 测试用: 指定工作目录和端口, 其余走环境变量
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 数据库目录 (work_dir/database)
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 日志目录 (work_dir/logs)
    pub fn logs_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    /// 建立工作目录结构, 幂等
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}
