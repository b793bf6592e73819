//! 日志系统配置模块
//! 支持结构化日志与日志级别配置

use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

use crate::config::LoggingConfig;

/// 初始化日志系统
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    // 环境变量优先，其次取配置的级别
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if config.format == "json" {
        Registry::default()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        Registry::default()
            .with(filter)
            .with(fmt::layer().with_ansi(true))
            .init();
    }

    Ok(())
}

/// 简化初始化（使用默认配置）
pub fn init_default_logging() {
    let config = LoggingConfig::default();
    init_logging(&config).unwrap_or_else(|e| {
        eprintln!("Failed to initialize logging: {}", e);
        tracing_subscriber::fmt::init();
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_logging_config() {
        let config = crate::config::LoggingConfig {
            level: "debug".to_string(),
            format: "json".to_string(),
        };

        assert_eq!(config.level, "debug");
        assert_eq!(config.format, "json");
    }
}
