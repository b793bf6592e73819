//! 测试辅助模块
//! 提供可脚本化的 fake 钱包提供方与会话构造工具

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use ethers::types::U256;
use linkcore::{
    domain::{ChainDescriptor, WalletEvent},
    provider::{
        ConfirmedTransfer, PendingTransfer, ProviderBinding, ProviderError, WalletProvider,
    },
    service::wallet_session::WalletSession,
};
use tokio::sync::mpsc;

/// fake 钱包固定返回的交易哈希
pub const MOCK_TX_HASH: &str =
    "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

/// 可脚本化的 fake 钱包提供方
///
/// 计数器记录每个边界方法被调用的次数，用于断言
/// “本地校验失败时从不接触钱包”。
pub struct MockWalletProvider {
    pub accounts: Mutex<Vec<String>>,
    pub chain: Mutex<String>,
    /// 账户授权请求固定失败（错误码）
    pub reject_accounts_with: Mutex<Option<i64>>,
    /// 链切换固定失败（错误码）
    pub fail_switch_with: Mutex<Option<i64>>,
    /// 账户授权前的人为延迟（毫秒），模拟挂起的钱包弹窗
    pub accounts_delay_ms: Mutex<u64>,
    pub request_accounts_calls: AtomicUsize,
    pub send_transfer_calls: AtomicUsize,
    pub switch_chain_calls: AtomicUsize,
    pub add_chain_calls: AtomicUsize,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<WalletEvent>>>,
}

impl MockWalletProvider {
    pub fn with_wallet(accounts: &[&str], chain: &str) -> Arc<Self> {
        Arc::new(Self {
            accounts: Mutex::new(accounts.iter().map(|a| a.to_string()).collect()),
            chain: Mutex::new(chain.to_string()),
            reject_accounts_with: Mutex::new(None),
            fail_switch_with: Mutex::new(None),
            accounts_delay_ms: Mutex::new(0),
            request_accounts_calls: AtomicUsize::new(0),
            send_transfer_calls: AtomicUsize::new(0),
            switch_chain_calls: AtomicUsize::new(0),
            add_chain_calls: AtomicUsize::new(0),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    /// 向所有订阅者推送一个钱包事件
    pub fn emit(&self, event: WalletEvent) {
        let mut subscribers = self.subscribers.lock().unwrap();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        self.request_accounts_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.accounts_delay_ms.lock().unwrap();
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
        }

        if let Some(code) = *self.reject_accounts_with.lock().unwrap() {
            return Err(ProviderError::new(code, "User rejected the request".into()));
        }

        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        Ok(self.chain.lock().unwrap().clone())
    }

    async fn switch_chain(&self, _chain_id_hex: &str) -> Result<(), ProviderError> {
        self.switch_chain_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(code) = *self.fail_switch_with.lock().unwrap() {
            return Err(ProviderError::new(code, "Unrecognized chain ID".into()));
        }
        Ok(())
    }

    async fn add_chain(&self, _descriptor: &ChainDescriptor) -> Result<(), ProviderError> {
        self.add_chain_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn send_transfer(
        &self,
        _from: &str,
        _to: &str,
        _value_wei: U256,
    ) -> Result<PendingTransfer, ProviderError> {
        self.send_transfer_calls.fetch_add(1, Ordering::SeqCst);
        Ok(PendingTransfer {
            tx_hash: MOCK_TX_HASH.to_string(),
        })
    }

    async fn await_confirmation(&self, tx_hash: &str) -> Result<ConfirmedTransfer, ProviderError> {
        // 立即确认
        Ok(ConfirmedTransfer {
            tx_hash: tx_hash.to_string(),
        })
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(tx);
        rx
    }
}

/// 以 fake 提供方构造会话
pub fn session_for(mock: &Arc<MockWalletProvider>) -> Arc<WalletSession> {
    let provider: Arc<dyn WalletProvider> = mock.clone();
    WalletSession::new(ProviderBinding::from_provider(provider))
}
