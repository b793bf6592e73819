//! 基础设施：日志初始化

pub mod logging;
