//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 配置模块
//!
//! 定义课程缓存的配置结构，支持YAML与TOML。

use ahash::AHashMap as HashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::constants::{
    DEFAULT_CLEANUP_INTERVAL_SECS, DEFAULT_CONNECTION_NAME, DEFAULT_REDIS_TIMEOUT_MS,
    DEFAULT_UTC_OFFSET_HOURS, OFF_PEAK_TTL_SECS, PEAK_TTL_SECS,
};
use crate::error::{CatalogError, CatalogResult};
use crate::local_cache::LocalCacheConfig;
use crate::ttl_policy::{offset_from_hours, PeakHoursPolicy};

/// 课程缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// 使用的连接档案名
    pub connection: String,
    /// 连接档案
    pub connections: HashMap<String, RedisSettings>,
    /// 本地缓存配置
    pub local_cache: LocalCacheSettings,
    /// TTL策略配置
    pub ttl: TtlSettings,
    /// 单次远程读取的截止时间（毫秒），None表示不限
    pub fetch_timeout_ms: Option<u64>,
    /// 是否合并同一键的并发远程读取
    pub single_flight: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let mut connections = HashMap::new();
        connections.insert(DEFAULT_CONNECTION_NAME.to_string(), RedisSettings::default());
        Self {
            connection: DEFAULT_CONNECTION_NAME.to_string(),
            connections,
            local_cache: LocalCacheSettings::default(),
            ttl: TtlSettings::default(),
            fetch_timeout_ms: None,
            single_flight: false,
        }
    }
}

/// Redis连接档案
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisSettings {
    pub url: String,
    pub db: i64,
    pub password: Option<String>,
    pub connection_timeout_ms: u64,
    pub io_timeout_ms: u64,
}

impl Default for RedisSettings {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            db: 0,
            password: None,
            connection_timeout_ms: DEFAULT_REDIS_TIMEOUT_MS,
            io_timeout_ms: DEFAULT_REDIS_TIMEOUT_MS,
        }
    }
}

/// 本地缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalCacheSettings {
    /// 后台清理间隔（秒）
    pub cleanup_interval_secs: u64,
}

impl Default for LocalCacheSettings {
    fn default() -> Self {
        Self {
            cleanup_interval_secs: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

/// TTL策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtlSettings {
    /// 参考时区（UTC偏移小时）
    pub utc_offset_hours: i32,
    /// 高峰时段TTL（秒）
    pub peak_secs: u64,
    /// 非高峰时段TTL（秒）
    pub off_peak_secs: u64,
}

impl Default for TtlSettings {
    fn default() -> Self {
        Self {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            peak_secs: PEAK_TTL_SECS,
            off_peak_secs: OFF_PEAK_TTL_SECS,
        }
    }
}

impl CatalogConfig {
    /// 从YAML字符串加载并校验
    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从TOML字符串加载并校验
    pub fn from_toml_str(content: &str) -> CatalogResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载，按扩展名选择格式
    pub fn from_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            other => Err(CatalogError::ConfigError(format!(
                "不支持的配置文件格式: {:?}",
                other
            ))),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> CatalogResult<()> {
        if self.connection.is_empty() {
            return Err(CatalogError::ConfigError("连接名不能为空".to_string()));
        }

        let settings = self.connection_settings()?;
        if settings.url.is_empty() {
            return Err(CatalogError::ConfigError(format!(
                "连接 {} 的URL不能为空",
                self.connection
            )));
        }
        if settings.io_timeout_ms == 0 || settings.connection_timeout_ms == 0 {
            return Err(CatalogError::ConfigError("Redis超时必须大于0".to_string()));
        }

        if offset_from_hours(self.ttl.utc_offset_hours).is_none() {
            return Err(CatalogError::ConfigError(format!(
                "无效的时区偏移: {}",
                self.ttl.utc_offset_hours
            )));
        }
        if self.ttl.peak_secs == 0 || self.ttl.off_peak_secs == 0 {
            return Err(CatalogError::ConfigError("TTL必须大于0".to_string()));
        }

        if self.local_cache.cleanup_interval_secs == 0 {
            return Err(CatalogError::ConfigError("清理间隔必须大于0".to_string()));
        }

        if self.fetch_timeout_ms == Some(0) {
            return Err(CatalogError::ConfigError("远程读取截止时间必须大于0".to_string()));
        }

        Ok(())
    }

    /// 当前选中的连接档案
    pub fn connection_settings(&self) -> CatalogResult<&RedisSettings> {
        self.connections.get(&self.connection).ok_or_else(|| {
            CatalogError::ConfigError(format!("未找到连接档案: {}", self.connection))
        })
    }

    /// 生成选中档案的Redis配置
    #[cfg(feature = "redis")]
    pub fn redis_config(&self) -> CatalogResult<crate::redis_storage::RedisConfig> {
        let settings = self.connection_settings()?;
        let mut config = crate::redis_storage::RedisConfig::new(settings.url.clone())
            .name(self.connection.clone())
            .db(settings.db)
            .connection_timeout(Duration::from_millis(settings.connection_timeout_ms))
            .io_timeout(Duration::from_millis(settings.io_timeout_ms));
        if let Some(password) = &settings.password {
            config = config.password(password.clone());
        }
        Ok(config)
    }

    /// 生成TTL策略
    pub fn ttl_policy(&self) -> CatalogResult<PeakHoursPolicy> {
        let offset = offset_from_hours(self.ttl.utc_offset_hours).ok_or_else(|| {
            CatalogError::ConfigError(format!("无效的时区偏移: {}", self.ttl.utc_offset_hours))
        })?;
        Ok(PeakHoursPolicy::new(offset).durations(
            Duration::from_secs(self.ttl.peak_secs),
            Duration::from_secs(self.ttl.off_peak_secs),
        ))
    }

    pub fn local_cache_config(&self) -> LocalCacheConfig {
        LocalCacheConfig::new()
            .cleanup_interval(Duration::from_secs(self.local_cache.cleanup_interval_secs))
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }
}
