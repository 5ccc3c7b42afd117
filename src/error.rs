//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 错误类型定义
//!
//! 使用thiserror定义所有错误类型。

use thiserror::Error;

/// 课程目录错误类型
#[derive(Error, Debug)]
pub enum CatalogError {
    /// 远程存储不可用（连接、超时或服务端错误）
    #[error("远程存储不可用: {0}")]
    RemoteUnavailable(#[from] StorageError),

    /// 远程存储中不存在该键
    #[error("远程存储未命中: {0}")]
    RemoteMiss(String),

    /// 远程值无法解析为期望的结构
    #[error("反序列化失败: key={key}, {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// 课程ID映射值不是合法的正整数
    #[error("无效的课程ID: key={key}, value={value:?}")]
    InvalidCourseId { key: String, value: String },

    /// 配置错误
    #[error("配置错误: {0}")]
    ConfigError(String),

    /// IO错误
    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML解析错误
    #[error("YAML解析错误: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML解析错误
    #[error("TOML解析错误: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl CatalogError {
    /// 是否为远程存储层面的失败（不可用或未命中）
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CatalogError::RemoteUnavailable(_) | CatalogError::RemoteMiss(_)
        )
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// 存储错误
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// 连接错误
    #[error("连接错误: {0}")]
    ConnectionError(String),

    /// 查询错误
    #[error("查询错误: {0}")]
    QueryError(String),

    /// 超时错误
    #[error("超时错误: {0}")]
    TimeoutError(String),
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for StorageError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_timeout() {
            StorageError::TimeoutError(err.to_string())
        } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
            StorageError::ConnectionError(err.to_string())
        } else {
            StorageError::QueryError(err.to_string())
        }
    }
}
