//! 钱包桥接客户端
//!
//! 通过 JSON-RPC over HTTP 与外部钱包端点对话，方法面与注入钱包一致：
//! eth_requestAccounts / eth_chainId / wallet_switchEthereumChain /
//! wallet_addEthereumChain / eth_sendTransaction / eth_getTransactionReceipt。
//! 账户与链变化通过轮询 eth_accounts / eth_chainId 差分合成事件。

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use ethers::types::U256;
use tokio::sync::mpsc;

use crate::{
    config::WalletConfig,
    domain::{ChainDescriptor, WalletEvent},
    provider::{ConfirmedTransfer, PendingTransfer, ProviderError, WalletProvider},
};

pub struct HttpBridgeProvider {
    http_client: reqwest::Client,
    endpoint: String,
    confirm_poll: Duration,
    event_poll: Duration,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<WalletEvent>>>,
}

impl HttpBridgeProvider {
    /// 构造桥接客户端；event_poll_ms > 0 时启动事件轮询任务
    pub fn connect(endpoint: &str, config: &WalletConfig) -> Arc<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let provider = Arc::new(Self {
            http_client: client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            confirm_poll: Duration::from_millis(config.confirm_poll_ms.max(100)),
            event_poll: Duration::from_millis(config.event_poll_ms),
            subscribers: Mutex::new(Vec::new()),
        });

        if config.event_poll_ms > 0 {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let poller = provider.clone();
                    handle.spawn(async move { poller.run_event_poller().await });
                }
                Err(_) => {
                    tracing::debug!("no async runtime available; wallet event poller disabled");
                }
            }
        }

        provider
    }

    /// 调用钱包 JSON-RPC 方法，错误对象原样映射为 ProviderError
    async fn rpc_call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::other(format!("failed to reach wallet bridge: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::other(format!("failed to read wallet response: {e}")))?;

        if !status.is_success() {
            return Err(ProviderError::other(format!(
                "wallet bridge returned status {status}: {body}"
            )));
        }

        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ProviderError::other(format!("invalid wallet response: {e}")))?;

        if let Some(error) = json.get("error") {
            let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown wallet error")
                .to_string();
            return Err(ProviderError::new(code, message));
        }

        Ok(json.get("result").cloned().unwrap_or(serde_json::Value::Null))
    }

    fn broadcast(&self, event: WalletEvent) {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// 事件轮询：差分 eth_accounts / eth_chainId，合成变化事件
    async fn run_event_poller(self: Arc<Self>) {
        let mut last_accounts: Option<Vec<String>> = None;
        let mut last_chain: Option<String> = None;

        loop {
            tokio::time::sleep(self.event_poll).await;

            match self.rpc_call("eth_accounts", serde_json::json!([])).await {
                Ok(value) => {
                    if let Ok(accounts) = serde_json::from_value::<Vec<String>>(value) {
                        if last_accounts.as_ref() != Some(&accounts) {
                            last_accounts = Some(accounts.clone());
                            self.broadcast(WalletEvent::AccountsChanged(accounts));
                        }
                    }
                }
                Err(e) => {
                    tracing::debug!(error = %e, "wallet account poll failed");
                }
            }

            match self.rpc_call("eth_chainId", serde_json::json!([])).await {
                Ok(serde_json::Value::String(chain_id)) => {
                    if last_chain.as_deref() != Some(chain_id.as_str()) {
                        last_chain = Some(chain_id.clone());
                        self.broadcast(WalletEvent::ChainChanged(chain_id));
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "wallet chain poll failed");
                }
            }
        }
    }
}

#[async_trait]
impl WalletProvider for HttpBridgeProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderError> {
        let value = self
            .rpc_call("eth_requestAccounts", serde_json::json!([]))
            .await?;
        serde_json::from_value(value)
            .map_err(|e| ProviderError::other(format!("malformed accounts response: {e}")))
    }

    async fn chain_id(&self) -> Result<String, ProviderError> {
        let value = self.rpc_call("eth_chainId", serde_json::json!([])).await?;
        value
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ProviderError::other("malformed chain id response".into()))
    }

    async fn switch_chain(&self, chain_id_hex: &str) -> Result<(), ProviderError> {
        self.rpc_call(
            "wallet_switchEthereumChain",
            serde_json::json!([{ "chainId": chain_id_hex }]),
        )
        .await?;
        Ok(())
    }

    async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<(), ProviderError> {
        self.rpc_call("wallet_addEthereumChain", serde_json::json!([descriptor]))
            .await?;
        Ok(())
    }

    async fn send_transfer(
        &self,
        from: &str,
        to: &str,
        value_wei: U256,
    ) -> Result<PendingTransfer, ProviderError> {
        let value = self
            .rpc_call(
                "eth_sendTransaction",
                serde_json::json!([{
                    "from": from,
                    "to": to,
                    "value": format!("0x{:x}", value_wei),
                }]),
            )
            .await?;

        let tx_hash = value
            .as_str()
            .ok_or_else(|| ProviderError::other("malformed transaction hash response".into()))?;

        Ok(PendingTransfer {
            tx_hash: tx_hash.to_string(),
        })
    }

    async fn await_confirmation(&self, tx_hash: &str) -> Result<ConfirmedTransfer, ProviderError> {
        // 无超时：挂起的钱包确认与链上打包时间都可能任意长
        loop {
            let receipt = self
                .rpc_call("eth_getTransactionReceipt", serde_json::json!([tx_hash]))
                .await?;

            if receipt.is_null() {
                tokio::time::sleep(self.confirm_poll).await;
                continue;
            }

            let status = receipt.get("status").and_then(|s| s.as_str());
            if status == Some("0x0") {
                return Err(ProviderError::other(format!(
                    "transfer {tx_hash} reverted on-chain"
                )));
            }

            return Ok(ConfirmedTransfer {
                tx_hash: tx_hash.to_string(),
            });
        }
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.push(tx);
        rx
    }
}
