//! LinkCore 主入口
//! 钱包会话服务

use std::sync::Arc;

use anyhow::Result;
use linkcore::{
    app_state::AppState, config::Config, provider::ProviderBinding,
    service::wallet_session::WalletSession,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ✅ 1. 加载环境变量
    dotenvy::dotenv().ok();

    // ✅ 2. 加载配置（CONFIG_PATH 指向的文件优先）
    let config = match std::env::var("CONFIG_PATH") {
        Ok(path) => Config::from_env_and_file(Some(path.as_str()))?,
        Err(_) => Config::from_env()?,
    };
    config.validate()?;

    // ✅ 3. 初始化日志
    linkcore::infrastructure::logging::init_logging(&config.logging)
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    tracing::info!("🚀 Starting LinkCore wallet session service");

    // ✅ 4. 探测钱包桥接端点（一次性；未检测到则降级运行）
    let binding = ProviderBinding::initialize(&config.wallet);
    if binding.is_detected() {
        tracing::info!("✅ Wallet bridge detected");
    }

    // ✅ 5. 创建会话并挂接事件监听
    let session = WalletSession::new(binding);
    session.attach_listeners();

    // ✅ 6. 启动 HTTP 表现层
    let config = Arc::new(config);
    let state = Arc::new(AppState::new(config.clone(), session.clone()));
    let app = linkcore::api::routes(state);

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!("✅ Listening on {}", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(session))
        .await?;

    Ok(())
}

/// Ctrl-C 触发优雅退出：解除事件监听后交还控制权
async fn shutdown_signal(session: Arc<WalletSession>) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down; detaching wallet listeners");
    session.detach_listeners();
}
