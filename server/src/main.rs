use voltmart_server::{Config, Server, ServerState, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 环境: .env, 工作目录, 日志
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    config.ensure_work_dir_structure()?;
    let logs_dir = config.logs_dir();
    voltmart_server::init_logger_with_file(logs_dir.to_str());

    print_banner();
    tracing::info!("⚡ VoltMart Server starting...");

    // 2. 数据库与服务句柄
    let state = ServerState::initialize(&config).await?;

    // 3. 监听直到收到关闭信号
    if let Err(e) = Server::new(config, state).run().await {
        tracing::error!(error = %e, "Server exited abnormally");
        return Err(e.into());
    }

    Ok(())
}
