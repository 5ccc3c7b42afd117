//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 存储抽象层
//!
//! 定义远程存储接口和内存实现。课程目录只从远程存储读取，从不写入。

use crate::error::StorageError;
use async_trait::async_trait;

/// 远程存储接口
#[async_trait]
pub trait Storage: Send + Sync {
    /// 获取值
    ///
    /// `Ok(None)` 表示远程未命中，`Err` 表示远程不可用。
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
}

/// 内存存储实现
///
/// 供宿主预置数据或测试使用。
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: dashmap::DashMap<String, String>,
}

impl MemoryStorage {
    /// 创建新的内存存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入值
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    /// 删除值
    pub fn remove(&self, key: &str) -> Option<String> {
        self.data.remove(key).map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }
}
