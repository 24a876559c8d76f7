//! HTTP 服务器
//!
//! 绑定端口、挂载路由、处理优雅关闭

use std::time::Duration;

use crate::core::{Config, Result, ServerState};

/// HTTP Server
///
/// 持有配置与已初始化的 [`ServerState`], [`Server::run`] 驱动整个服务生命周期。
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn new(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// 启动服务并一直运行到收到 Ctrl-C
    ///
    /// 收到信号后进入优雅关闭, 在 `shutdown_timeout_ms` 的排水窗口内
    /// 等待存量连接结束, 超时则直接退出。
    pub async fn run(self) -> Result<()> {
        let app = crate::api::build_router(self.state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(
            environment = %self.config.environment,
            "⚡ VoltMart server listening on {}",
            addr
        );

        // 信号要在两处观察: 触发优雅关闭, 以及启动排水计时
        let (shutdown_tx, mut graceful_rx) = tokio::sync::watch::channel(false);
        let mut drain_rx = graceful_rx.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
            let _ = shutdown_tx.send(true);
        });

        let serve = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = graceful_rx.changed().await;
        });

        let drain = Duration::from_millis(self.config.shutdown_timeout_ms);
        tokio::select! {
            result = serve => result?,
            _ = async {
                let _ = drain_rx.changed().await;
                tokio::time::sleep(drain).await;
            } => {
                tracing::warn!("Drain window of {:?} elapsed, closing remaining connections", drain);
            }
        }

        Ok(())
    }
}
