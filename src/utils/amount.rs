//! 金额换算
//!
//! 十进制原生代币数量 → wei。转换发生在接触钱包之前，
//! 解析失败按本地校验失败处理。

use ethers::types::U256;

use crate::error::SessionError;

/// 解析十进制原生代币数量为 wei
pub fn parse_native_amount(amount: &str) -> Result<U256, SessionError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(SessionError::ValidationFailed("amount is required".into()));
    }
    if trimmed.starts_with('-') {
        return Err(SessionError::ValidationFailed(
            "amount must be positive".into(),
        ));
    }

    ethers::utils::parse_ether(trimmed).map_err(|e| {
        SessionError::ValidationFailed(format!("invalid native amount {trimmed:?}: {e}"))
    })
}
