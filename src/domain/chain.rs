//! 链描述符与链ID标准化
//!
//! `ChainDescriptor` 是 `wallet_addEthereumChain` 的出站请求负载，
//! 字段名按钱包约定使用 camelCase，不做持久化。

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::SessionError;

/// 原生代币信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// 链注册请求负载
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    /// 0x 十六进制链ID
    pub chain_id: String,
    pub chain_name: String,
    /// 有序 RPC 端点列表
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

impl ChainDescriptor {
    /// 出站前的本地校验：链ID可标准化、名称非空、至少一个RPC端点
    pub fn validate(&self) -> Result<(), SessionError> {
        normalize_chain_id(&self.chain_id)?;
        if self.chain_name.trim().is_empty() {
            return Err(SessionError::ValidationFailed(
                "chain name is required".into(),
            ));
        }
        if self.rpc_urls.iter().all(|u| u.trim().is_empty()) {
            return Err(SessionError::ValidationFailed(
                "at least one rpc url is required".into(),
            ));
        }
        Ok(())
    }

    /// 返回链ID已标准化的副本
    pub fn normalized(&self) -> Result<Self, SessionError> {
        let mut descriptor = self.clone();
        descriptor.chain_id = normalize_chain_id(&self.chain_id)?;
        Ok(descriptor)
    }
}

/// 标准化链ID
///
/// 接受 0x 前缀的十六进制或纯十进制输入，统一输出小写 0x 形式。
pub fn normalize_chain_id(input: &str) -> Result<String, SessionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SessionError::ValidationFailed("chain id is required".into()));
    }

    let value = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u128::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u128>()
    };

    match value {
        Ok(id) => Ok(format!("0x{:x}", id)),
        Err(_) => Err(SessionError::ValidationFailed(format!(
            "invalid chain id: {trimmed:?}"
        ))),
    }
}
