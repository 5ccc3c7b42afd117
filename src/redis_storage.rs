//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Redis客户端封装
//!
//! 课程数据由其他服务写入共享Redis，这里只提供只读的 `GET`。
//!
//! # 特性
//!
//! - **连接管理**: 使用ConnectionManager管理连接，断线自动重连
//! - **超时控制**: 每次读取受IO超时约束，超时按远程不可用处理
//! - **单次尝试**: 不做重试和退避，失败直接返回给调用方
//! - **密码保护**: 密码使用 `Secret` 包装，不会出现在日志中

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client, IntoConnectionInfo};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tracing::{debug, error, info, trace};

use crate::constants::{DEFAULT_CONNECTION_NAME, DEFAULT_REDIS_TIMEOUT_MS};
use crate::error::StorageError;
use crate::storage::Storage;

/// 最大键总长度
const MAX_KEY_LENGTH: usize = 1024;

/// 验证完整键
fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty() {
        return Err(StorageError::QueryError("键不能为空".to_string()));
    }

    if key.len() > MAX_KEY_LENGTH {
        return Err(StorageError::QueryError(format!(
            "键长度超过限制（最大 {} 字符）",
            MAX_KEY_LENGTH
        )));
    }

    if key.contains('\0') {
        return Err(StorageError::QueryError("键包含非法字符".to_string()));
    }

    Ok(())
}

/// Redis配置
#[derive(Clone)]
pub struct RedisConfig {
    /// 逻辑连接名（对应配置中的连接档案）
    pub name: String,
    /// Redis连接URL
    pub url: String,
    /// 数据库索引
    pub db: i64,
    /// 密码（使用 Secret 包装以防止意外泄露）
    pub password: Option<Secret<String>>,
    /// 连接超时
    pub connection_timeout: Duration,
    /// 读取超时
    pub io_timeout: Duration,
}

impl std::fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisConfig")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("db", &self.db)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("connection_timeout", &self.connection_timeout)
            .field("io_timeout", &self.io_timeout)
            .finish()
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CONNECTION_NAME.to_string(),
            url: "redis://127.0.0.1:6379".to_string(),
            db: 0,
            password: None,
            connection_timeout: Duration::from_millis(DEFAULT_REDIS_TIMEOUT_MS),
            io_timeout: Duration::from_millis(DEFAULT_REDIS_TIMEOUT_MS),
        }
    }
}

impl RedisConfig {
    /// 创建新的Redis配置
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// 设置逻辑连接名
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置数据库索引
    pub fn db(mut self, db: i64) -> Self {
        self.db = db;
        self
    }

    /// 设置密码
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(Secret::new(password.into()));
        self
    }

    /// 设置连接超时
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// 设置读取超时
    pub fn io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }

    fn connection_info(&self) -> Result<redis::ConnectionInfo, StorageError> {
        let mut info = self.url.as_str().into_connection_info().map_err(|e| {
            error!("解析Redis URL失败: {}", e);
            StorageError::ConnectionError(format!("解析Redis URL失败: {}", e))
        })?;
        info.redis.db = self.db;
        if let Some(password) = &self.password {
            info.redis.password = Some(password.expose_secret().clone());
        }
        Ok(info)
    }
}

/// Redis存储实现
#[derive(Clone)]
pub struct RedisStorage {
    /// 连接管理器（内部共享，clone开销很小）
    conn_manager: ConnectionManager,
    /// 配置
    config: RedisConfig,
}

impl std::fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStorage")
            .field("config", &self.config)
            .finish()
    }
}

impl RedisStorage {
    /// 创建新的Redis存储并建立连接
    pub async fn new(config: RedisConfig) -> Result<Self, StorageError> {
        info!("创建Redis存储, connection={}, URL: {}", config.name, config.url);

        let client = Client::open(config.connection_info()?).map_err(|e| {
            error!("创建Redis客户端失败: {}", e);
            StorageError::ConnectionError(format!("创建Redis客户端失败: {}", e))
        })?;

        let conn_manager =
            tokio::time::timeout(config.connection_timeout, ConnectionManager::new(client))
                .await
                .map_err(|_| {
                    error!("建立Redis连接超时: connection={}", config.name);
                    StorageError::TimeoutError(format!(
                        "建立Redis连接超时: {:?}",
                        config.connection_timeout
                    ))
                })?
                .map_err(|e| {
                    error!("创建Redis连接管理器失败: {}", e);
                    StorageError::ConnectionError(format!("创建Redis连接管理器失败: {}", e))
                })?;

        info!("Redis连接建立成功: connection={}", config.name);
        Ok(Self {
            conn_manager,
            config,
        })
    }

    /// 检查Redis连接
    pub async fn ping(&self) -> Result<(), StorageError> {
        let mut conn = self.conn_manager.clone();
        let _: String = tokio::time::timeout(
            self.config.io_timeout,
            redis::cmd("PING").query_async(&mut conn),
        )
        .await
        .map_err(|_| StorageError::TimeoutError("PING超时".to_string()))?
        .map_err(|e| {
            error!("Redis PING失败: {}", e);
            StorageError::from(e)
        })?;
        Ok(())
    }

    /// 获取配置
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }
}

#[async_trait]
impl Storage for RedisStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        validate_key(key)?;

        let mut conn = self.conn_manager.clone();
        let result: Option<String> = tokio::time::timeout(self.config.io_timeout, conn.get(key))
            .await
            .map_err(|_| {
                debug!("Redis GET超时: key={}", key);
                StorageError::TimeoutError(format!("GET超时: {}", key))
            })?
            .map_err(|e| {
                error!("Redis GET失败: key={}, error={}", key, e);
                StorageError::from(e)
            })?;

        trace!("GET key={}, found={}", key, result.is_some());
        Ok(result)
    }
}
