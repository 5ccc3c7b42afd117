//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 日志初始化
//!
//! 库本身只通过 `tracing` 发出事件，不安装订阅者。
//! 宿主程序可调用 [`init_tracing`] 安装一个基于环境变量过滤的fmt订阅者。
//!
//! # 示例
//!
//! ```no_run
//! coursecache::telemetry::init_tracing("coursecache=debug").unwrap();
//! ```

use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{CatalogError, CatalogResult};

/// 安装全局fmt订阅者
///
/// `RUST_LOG` 已设置时优先使用它，否则使用 `default_filter`。
/// 全局订阅者已存在时返回 `ConfigError`。
pub fn init_tracing(default_filter: &str) -> CatalogResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| CatalogError::ConfigError(format!("无效的日志过滤器: {}", e)))?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| CatalogError::ConfigError(format!("日志订阅者初始化失败: {}", e)))
}
