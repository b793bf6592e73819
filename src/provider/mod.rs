//! 钱包提供方边界
//!
//! 核心唯一的外部边界：注入的钱包句柄被抽象为 `WalletProvider` trait，
//! 由 `ProviderBinding` 显式注入会话，测试时可替换为 fake，
//! 核心逻辑从不引用进程级全局对象。

use async_trait::async_trait;
use ethers::types::U256;
use tokio::sync::mpsc;

use crate::domain::{ChainDescriptor, WalletEvent};

pub mod binding;
pub mod bridge;

pub use binding::{ProviderBinding, WalletSigner};
pub use bridge::HttpBridgeProvider;

/// EIP-1193：用户拒绝请求
pub const CODE_USER_REJECTED: i64 = 4001;
/// EIP-3085/3326：切换目标链未在钱包中注册
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

/// 钱包边界错误：{code, message}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: String) -> Self {
        Self { code, message }
    }

    /// 无结构化错误码的传输/解析失败
    pub fn other(message: String) -> Self {
        Self { code: -1, message }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wallet error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for ProviderError {}

/// 已提交、尚未确认的转账
#[derive(Debug, Clone)]
pub struct PendingTransfer {
    pub tx_hash: String,
}

/// 已在链上确认的转账
#[derive(Debug, Clone)]
pub struct ConfirmedTransfer {
    pub tx_hash: String,
}

/// 注入钱包句柄的契约
///
/// 对应浏览器注入钱包的能力面：账户授权、活动链查询、链切换/注册、
/// 原生代币转账与确认等待，以及账户/链变化事件流。
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// 请求账户授权（可能弹窗，可能被拒绝）
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError>;

    /// 查询活动链ID（0x 十六进制）
    async fn chain_id(&self) -> Result<String, ProviderError>;

    /// 请求切换活动链；成功后钱包会另行推送 ChainChanged 事件
    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError>;

    /// 注册新链定义；钱包对已注册链做 no-op
    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError>;

    /// 以 `from` 账户提交原生代币转账，返回待确认交易
    async fn send_transfer(
        &self,
        from: &str,
        to: &str,
        value_wei: U256,
    ) -> Result<PendingTransfer, ProviderError>;

    /// 等待链上确认
    async fn await_confirmation(&self, tx_hash: &str) -> Result<ConfirmedTransfer, ProviderError>;

    /// 订阅账户/链变化事件流
    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent>;
}
