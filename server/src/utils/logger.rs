//! Logging Infrastructure
//!
//! tracing-subscriber setup. Filtering follows `RUST_LOG` when present;
//! output goes to a daily-rolling file once the work dir exists, to the
//! console before that (first boot, tests).

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_FILTER: &str = "voltmart_server=info,tower_http=info";

/// Console-only logger
pub fn init_logger() {
    init_logger_with_file(None);
}

/// 日志初始化: 目录存在时写天级滚动文件, 否则退回控制台输出
pub fn init_logger_with_file(log_dir: Option<&str>) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    match log_dir.map(Path::new).filter(|p| p.exists()) {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "voltmart-server");
            builder.with_writer(appender).with_ansi(false).init();
        }
        None => builder.init(),
    }
}
