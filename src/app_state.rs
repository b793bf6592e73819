use std::sync::Arc;

use crate::{config::Config, service::wallet_session::WalletSession};

/// 应用状态
/// 包含所有共享资源
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<WalletSession>,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(config: Arc<Config>, session: Arc<WalletSession>) -> Self {
        Self { config, session }
    }
}
