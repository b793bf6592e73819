//! 领域模型：会话状态机、链描述符、转账请求

pub mod chain;
pub mod session;
pub mod transfer;

pub use chain::{normalize_chain_id, ChainDescriptor, NativeCurrency};
pub use session::{SessionState, WalletEvent};
pub use transfer::{TransferReceipt, TransferRequest};
