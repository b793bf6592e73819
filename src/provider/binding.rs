//! 提供方绑定
//!
//! 在初始化时探测一次钱包端点并包装为客户端；未探测到时保持缺失，
//! 进程生命周期内不再重试（静默降级，不是待修复的缺陷）。

use std::sync::Arc;

use ethers::types::U256;

use crate::{
    config::WalletConfig,
    error::SessionError,
    provider::{HttpBridgeProvider, PendingTransfer, ProviderError, WalletProvider},
};

/// 钱包句柄的一次性绑定
pub struct ProviderBinding {
    provider: Option<Arc<dyn WalletProvider>>,
}

impl ProviderBinding {
    /// 探测配置的钱包桥接端点并包装客户端，进程内只构造一次
    pub fn initialize(config: &WalletConfig) -> Self {
        match config.bridge_url.as_deref() {
            Some(url) if !url.trim().is_empty() => {
                let provider: Arc<dyn WalletProvider> = HttpBridgeProvider::connect(url, config);
                tracing::info!(endpoint = %url, "wallet bridge detected");
                Self {
                    provider: Some(provider),
                }
            }
            _ => {
                // 诊断而非用户可见错误
                tracing::warn!(
                    "no wallet bridge configured; session will stay degraded for this process"
                );
                Self { provider: None }
            }
        }
    }

    /// 未检测到钱包的绑定
    pub fn absent() -> Self {
        Self { provider: None }
    }

    /// 直接注入提供方（测试替身入口）
    pub fn from_provider(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    pub fn is_detected(&self) -> bool {
        self.provider.is_some()
    }

    pub fn try_provider(&self) -> Option<&Arc<dyn WalletProvider>> {
        self.provider.as_ref()
    }

    pub fn provider(&self) -> Result<&Arc<dyn WalletProvider>, SessionError> {
        self.provider.as_ref().ok_or_else(|| {
            SessionError::WalletUnavailable("no wallet handle was detected at startup".into())
        })
    }

    /// 生成绑定到指定账户的签名器
    pub fn signer_for(&self, account: &str) -> Result<WalletSigner, SessionError> {
        Ok(WalletSigner {
            provider: self.provider()?.clone(),
            account: account.to_string(),
        })
    }
}

/// 绑定到单个账户的转账签名器
pub struct WalletSigner {
    provider: Arc<dyn WalletProvider>,
    account: String,
}

impl WalletSigner {
    pub fn account(&self) -> &str {
        &self.account
    }

    pub async fn send_transfer(
        &self,
        to: &str,
        value_wei: U256,
    ) -> Result<PendingTransfer, ProviderError> {
        self.provider
            .send_transfer(&self.account, to, value_wei)
            .await
    }

    pub async fn await_confirmation(
        &self,
        tx_hash: &str,
    ) -> Result<crate::provider::ConfirmedTransfer, ProviderError> {
        self.provider.await_confirmation(tx_hash).await
    }
}
