//! LinkCore - 钱包会话服务
//!
//! 绑定外部钱包提供方，从钱包事件调和本地会话（账户 + 链ID），
//! 支持链切换/注册与原生代币转账。核心从不引用进程级全局对象，
//! 提供方通过 `ProviderBinding` 显式注入。

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod error_body;
pub mod infrastructure;
pub mod metrics;
pub mod provider;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use app_state::AppState;
pub use error::{AppError, AppErrorCode, SessionError};

pub mod prelude {
    pub use crate::{
        app_state::AppState,
        domain::{ChainDescriptor, SessionState, TransferRequest, WalletEvent},
        error::{AppError, SessionError},
        provider::{ProviderBinding, WalletProvider},
        service::wallet_session::WalletSession,
    };
}
