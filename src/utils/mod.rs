//! 通用工具：金额换算、已知链注册表

pub mod amount;
pub mod chain_registry;

pub use amount::parse_native_amount;
