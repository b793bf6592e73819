//! 钱包会话编排
//!
//! 核心操作面：connect / disconnect / switch_chain / add_chain / send。
//! 状态只在确认成功或显式事件时推进；任何失败都保持先前状态不变。
//! 同一会话同一时刻只允许一个在途钱包操作，重叠调用被本地拒绝。

use std::sync::{Arc, Mutex, RwLock};

use serde::Serialize;
use tokio::task::JoinHandle;
use utoipa::ToSchema;

use crate::{
    domain::{
        normalize_chain_id, ChainDescriptor, SessionState, TransferReceipt, TransferRequest,
        WalletEvent,
    },
    error::SessionError,
    metrics,
    provider::ProviderBinding,
    utils::parse_native_amount,
};

/// 会话快照（表现层读取）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub connected: bool,
    pub account: Option<String>,
    pub chain_id: Option<String>,
    pub wallet_detected: bool,
}

pub struct WalletSession {
    binding: ProviderBinding,
    state: RwLock<SessionState>,
    // 在途操作互斥：try_lock 失败即拒绝，不排队
    op_gate: tokio::sync::Mutex<()>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl WalletSession {
    pub fn new(binding: ProviderBinding) -> Arc<Self> {
        Arc::new(Self {
            binding,
            state: RwLock::new(SessionState::new()),
            op_gate: tokio::sync::Mutex::new(()),
            listener: Mutex::new(None),
        })
    }

    pub fn wallet_detected(&self) -> bool {
        self.binding.is_detected()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = match self.state.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        SessionSnapshot {
            connected: state.is_connected(),
            account: state.account().map(str::to_string),
            chain_id: state.chain_id().map(str::to_string),
            wallet_detected: self.binding.is_detected(),
        }
    }

    /// 挂接事件监听任务，每个会话只挂接一次
    pub fn attach_listeners(self: &Arc<Self>) {
        let Some(provider) = self.binding.try_provider() else {
            return;
        };

        let mut guard = match self.listener.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_some() {
            return;
        }

        let mut events = provider.subscribe();
        let session = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                let Some(session) = session.upgrade() else {
                    break;
                };
                session.apply_event(event);
            }
        });
        *guard = Some(handle);
        tracing::debug!("wallet event listeners attached");
    }

    /// 解除事件监听，恰好一次；重复调用为 no-op
    pub fn detach_listeners(&self) {
        let handle = match self.listener.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(handle) = handle {
            handle.abort();
            tracing::debug!("wallet event listeners detached");
        }
    }

    fn apply_event(&self, event: WalletEvent) {
        let changed = {
            let mut state = match self.state.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            state.apply(&event)
        };
        metrics::inc_event(event.type_str());
        tracing::debug!(event = event.type_str(), changed, "wallet event reconciled");
    }

    /// 请求账户授权与活动链，成功后进入 Connected
    ///
    /// 失败不改变任何状态，也不自动重试。
    pub async fn connect(&self) -> Result<SessionSnapshot, SessionError> {
        let provider = self.binding.provider()?.clone();
        let _gate = self.op_gate.try_lock().map_err(|_| {
            SessionError::ValidationFailed("another wallet operation is in flight".into())
        })?;

        let result: Result<(String, String), SessionError> = async {
            let accounts = provider
                .request_accounts()
                .await
                .map_err(SessionError::from_provider)?;
            let account = accounts.first().cloned().ok_or_else(|| {
                SessionError::RequestFailed("wallet returned no accounts".into())
            })?;
            let chain_id = provider
                .chain_id()
                .await
                .map_err(SessionError::from_provider)?;
            let chain_id = normalize_chain_id(&chain_id).map_err(|_| {
                SessionError::RequestFailed(format!("wallet returned malformed chain id {chain_id:?}"))
            })?;
            Ok((account, chain_id))
        }
        .await;

        match result {
            Ok((account, chain_id)) => {
                {
                    let mut state = match self.state.write() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    state.establish(account.clone(), chain_id.clone());
                }
                metrics::inc_connect_ok();
                tracing::info!(account = %account, chain_id = %chain_id, "wallet connected");
                Ok(self.snapshot())
            }
            Err(e) => {
                metrics::inc_connect_err();
                tracing::warn!(kind = e.kind(), error = %e, "wallet connect failed");
                Err(e)
            }
        }
    }

    /// 本地断开：清空会话状态；钱包侧授权无法撤销，保持不动
    pub fn disconnect(&self) -> SessionSnapshot {
        {
            let mut state = match self.state.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            state.clear();
        }
        metrics::inc_disconnect();
        tracing::info!("wallet session disconnected locally");
        self.snapshot()
    }

    /// 请求切换活动链
    ///
    /// 成功时静默返回，会话状态由后续 ChainChanged 事件更新；
    /// “链未注册”与其他失败分开上报。
    pub async fn switch_chain(&self, chain_id: &str) -> Result<String, SessionError> {
        let provider = self.binding.provider()?.clone();
        let chain_hex = normalize_chain_id(chain_id)?;
        let _gate = self.op_gate.try_lock().map_err(|_| {
            SessionError::ValidationFailed("another wallet operation is in flight".into())
        })?;

        match provider.switch_chain(&chain_hex).await {
            Ok(()) => {
                metrics::inc_chain_switch_ok();
                tracing::info!(chain_id = %chain_hex, "chain switch requested");
                Ok(chain_hex)
            }
            Err(e) => {
                metrics::inc_chain_switch_err();
                let err = SessionError::from_switch_error(e);
                tracing::warn!(chain_id = %chain_hex, error = %err, "chain switch failed");
                Err(err)
            }
        }
    }

    /// 注册新链定义；钱包对重复注册做 no-op
    pub async fn add_chain(&self, descriptor: &ChainDescriptor) -> Result<String, SessionError> {
        let provider = self.binding.provider()?.clone();
        descriptor.validate()?;
        let descriptor = descriptor.normalized()?;
        let _gate = self.op_gate.try_lock().map_err(|_| {
            SessionError::ValidationFailed("another wallet operation is in flight".into())
        })?;

        match provider.add_chain(&descriptor).await {
            Ok(()) => {
                metrics::inc_chain_add_ok();
                tracing::info!(chain_id = %descriptor.chain_id, name = %descriptor.chain_name, "chain registered");
                Ok(descriptor.chain_id)
            }
            Err(e) => {
                metrics::inc_chain_add_err();
                let err = SessionError::from_provider(e);
                tracing::warn!(chain_id = %descriptor.chain_id, error = %err, "chain registration failed");
                Err(err)
            }
        }
    }

    /// 提交原生代币转账并等待链上确认
    ///
    /// 前置条件（提供方存在、账户已连接、收款地址与金额非空、金额可解析）
    /// 违反时本地失败，不接触钱包。成功返回确认后的交易哈希，
    /// 会话状态不因转账而变化。
    pub async fn send(&self, request: &TransferRequest) -> Result<TransferReceipt, SessionError> {
        self.binding.provider()?;
        let account = self
            .snapshot()
            .account
            .ok_or_else(|| SessionError::ValidationFailed("no connected account".into()))?;
        request.validate()?;
        let value_wei = parse_native_amount(&request.amount_native)?;

        let _gate = self.op_gate.try_lock().map_err(|_| {
            SessionError::ValidationFailed("another wallet operation is in flight".into())
        })?;

        let signer = self.binding.signer_for(&account)?;

        let result: Result<TransferReceipt, SessionError> = async {
            let pending = signer
                .send_transfer(&request.to, value_wei)
                .await
                .map_err(SessionError::from_provider)?;
            tracing::info!(tx_hash = %pending.tx_hash, to = %request.to, "transfer submitted; awaiting confirmation");

            let confirmed = signer
                .await_confirmation(&pending.tx_hash)
                .await
                .map_err(SessionError::from_provider)?;

            Ok(TransferReceipt {
                tx_hash: confirmed.tx_hash,
            })
        }
        .await;

        match result {
            Ok(receipt) => {
                metrics::inc_transfer_ok();
                tracing::info!(tx_hash = %receipt.tx_hash, "transfer confirmed");
                Ok(receipt)
            }
            Err(e) => {
                metrics::inc_transfer_err();
                tracing::warn!(kind = e.kind(), error = %e, "transfer failed");
                Err(e)
            }
        }
    }
}
