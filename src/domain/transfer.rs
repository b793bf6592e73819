//! 原生代币转账请求
//!
//! 仅做存在性校验；地址不做校验和检查，由钱包侧裁决
//! （金额在发送前本地转换为 wei，转换失败同样视为本地校验失败）。

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::SessionError;

/// 转账请求：收款地址 + 十进制原生代币数量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TransferRequest {
    pub to: String,
    pub amount_native: String,
}

impl TransferRequest {
    /// 存在性前置校验，违反时不接触钱包
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.to.trim().is_empty() {
            return Err(SessionError::ValidationFailed(
                "recipient address is required".into(),
            ));
        }
        if self.amount_native.trim().is_empty() {
            return Err(SessionError::ValidationFailed("amount is required".into()));
        }
        Ok(())
    }
}

/// 链上确认后的转账回执
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransferReceipt {
    pub tx_hash: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_validation() {
        let ok = TransferRequest {
            to: "0xBBB".into(),
            amount_native: "0.01".into(),
        };
        assert!(ok.validate().is_ok());

        let no_recipient = TransferRequest {
            to: "".into(),
            amount_native: "0.01".into(),
        };
        assert!(matches!(
            no_recipient.validate(),
            Err(SessionError::ValidationFailed(_))
        ));

        let no_amount = TransferRequest {
            to: "0xBBB".into(),
            amount_native: "  ".into(),
        };
        assert!(matches!(
            no_amount.validate(),
            Err(SessionError::ValidationFailed(_))
        ));
    }
}
