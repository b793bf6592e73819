//! 会话服务层

pub mod wallet_session;

pub use wallet_session::{SessionSnapshot, WalletSession};
