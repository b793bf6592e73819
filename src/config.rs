//! 配置管理模块
//! 支持从环境变量和配置文件加载配置

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "text"
}

/// 钱包桥接配置
///
/// `bridge_url` 缺失表示宿主环境没有可用钱包；会话以降级模式运行。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub bridge_url: Option<String>,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// 确认轮询间隔（毫秒）
    pub confirm_poll_ms: u64,
    /// 账户/链事件轮询间隔（毫秒），0 表示关闭
    pub event_poll_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8088".into()),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".into()),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            bridge_url: std::env::var("WALLET_BRIDGE_URL").ok(),
            request_timeout_secs: std::env::var("WALLET_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            connect_timeout_secs: std::env::var("WALLET_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            confirm_poll_ms: std::env::var("WALLET_CONFIRM_POLL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1500),
            event_poll_ms: std::env::var("WALLET_EVENT_POLL_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2000),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            wallet: WalletConfig::default(),
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        Ok(Self::default())
    }

    /// 从配置文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        let config: Config =
            toml::from_str(&content).with_context(|| "Failed to parse config file as TOML")?;

        Ok(config)
    }

    /// 从环境变量和配置文件合并加载（配置文件优先级更高）
    pub fn from_env_and_file<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut config = Self::from_env()?;

        if let Some(path) = path {
            if path.as_ref().exists() {
                let file_config = Self::from_file(path)?;
                config = file_config;
            }
        }

        Ok(config)
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!("LOG_LEVEL must be one of: {:?}", valid_levels);
        }

        if self.logging.format != "json" && self.logging.format != "text" {
            anyhow::bail!("LOG_FORMAT must be 'json' or 'text'");
        }

        if let Some(url) = &self.wallet.bridge_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!("WALLET_BRIDGE_URL must start with http:// or https://");
            }
        }

        if self.wallet.request_timeout_secs == 0 {
            anyhow::bail!("WALLET_REQUEST_TIMEOUT_SECS must be positive");
        }
        if self.wallet.confirm_poll_ms == 0 {
            anyhow::bail!("WALLET_CONFIRM_POLL_MS must be positive");
        }

        Ok(())
    }
}
