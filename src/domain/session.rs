//! 会话状态机
//!
//! 本地会话只有两个状态：Disconnected（无账户）和 Connected（账户+链ID）。
//! 所有钱包事件通过统一的 `apply` 入口调和，不使用字符串键回调。

use serde::{Deserialize, Serialize};

/// 钱包事件（带标签变体，统一分发）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum WalletEvent {
    /// 账户集合变化；空集合表示钱包侧断开
    AccountsChanged(Vec<String>),
    /// 活动链变化（0x 十六进制链ID）
    ChainChanged(String),
}

impl WalletEvent {
    pub fn type_str(&self) -> &'static str {
        match self {
            WalletEvent::AccountsChanged(_) => "AccountsChanged",
            WalletEvent::ChainChanged(_) => "ChainChanged",
        }
    }
}

/// 本地会话状态
///
/// 不变量：`account` 存在当且仅当成功 connect 之后、且没有
/// disconnect/空账户事件发生。`chain_id` 在断开状态下也会缓存
/// （部分钱包独立于账户状态推送链事件）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    account: Option<String>,
    chain_id: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(&self) -> Option<&str> {
        self.account.as_deref()
    }

    pub fn chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// 显式连接成功后写入账户与链ID
    pub fn establish(&mut self, account: String, chain_id: String) {
        self.account = Some(account);
        self.chain_id = Some(chain_id);
    }

    /// 本地断开：仅清空本地状态，不撤销钱包侧授权
    pub fn clear(&mut self) {
        self.account = None;
        self.chain_id = None;
    }

    /// 事件调和入口，返回状态是否发生可观察变化
    ///
    /// 规则：
    /// - 非空账户集合 → account 取第一个条目
    /// - 空账户集合 → account 清空，chain_id 保持
    /// - 链变化 → 原地更新 chain_id，连接状态不变
    ///
    /// 重复投递同一事件不产生任何变化（幂等）。
    pub fn apply(&mut self, event: &WalletEvent) -> bool {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                let next = accounts.first().cloned();
                if self.account == next {
                    return false;
                }
                self.account = next;
                true
            }
            WalletEvent::ChainChanged(chain_id) => {
                if self.chain_id.as_deref() == Some(chain_id.as_str()) {
                    return false;
                }
                self.chain_id = Some(chain_id.clone());
                true
            }
        }
    }
}
