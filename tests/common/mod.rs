//! 测试通用工具模块
//!
//! 提供计数存储、故障存储和JSON样例数据。

#![allow(dead_code)]

use async_trait::async_trait;
use coursecache::{
    catalog::{CatalogOptions, CourseCatalog},
    error::StorageError,
    storage::{MemoryStorage, Storage},
    ttl_policy::FixedTtl,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 记录每次远程读取的存储
///
/// 可选的读取延迟用于构造并发窗口。
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    calls: AtomicU64,
    delay: Option<Duration>,
}

impl CountingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Default::default()
        }
    }

    pub fn insert(&self, key: &str, value: &str) {
        self.inner.insert(key, value);
    }

    pub fn remove(&self, key: &str) {
        self.inner.remove(key);
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.get(key).await
    }
}

/// 永远不可用的存储
#[derive(Default)]
pub struct FailingStorage {
    calls: AtomicU64,
}

impl FailingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::ConnectionError("connection refused".to_string()))
    }
}

/// 使用固定TTL创建目录（结果不依赖挂钟时间）
pub fn catalog_with_ttl(storage: Arc<dyn Storage>, ttl: Duration) -> CourseCatalog {
    CourseCatalog::with_options(storage, CatalogOptions::new().ttl_policy(FixedTtl(ttl)))
}

/// 五分钟固定TTL的目录
pub fn create_test_catalog(storage: Arc<dyn Storage>) -> CourseCatalog {
    catalog_with_ttl(storage, Duration::from_secs(300))
}

/// 课程列表样例
///
/// 系列1包含课程1、3，系列22包含课程2，课程4属于系列17。
pub fn courses_json() -> &'static str {
    r#"[
        {"Id": 1, "Name": "Phonics 1", "Level": 1, "SeriesId": 1, "Published": true},
        {"Id": 2, "Name": "AI Explorer", "Level": 1, "SeriesId": 22, "Published": true},
        {"Id": 3, "Name": "Phonics 2", "Level": 2, "SeriesId": 1, "Published": true},
        {"Id": 4, "Name": "Drawing", "Level": 1, "SeriesId": 17, "Published": false}
    ]"#
}

/// 含两个章节的课程样例
pub fn course_json(id: i64) -> String {
    format!(
        r#"{{
            "Id": {id}, "Name": "Phonics", "Level": 1, "SeriesId": 1, "UpgradeTest": true,
            "Chapters": [
                {{"Id": 1, "Name": "Letters", "Lessons": [
                    {{"Id": 101, "Name": "A"}},
                    {{"Id": 102, "Name": "B"}},
                    {{"Id": 103, "Name": "Review", "Review": true}}
                ]}},
                {{"Id": 2, "Name": "Words", "Lessons": [
                    {{"Id": 201, "Name": "Cat", "LogoHDUri": "cat@2x.png"}}
                ]}}
            ]
        }}"#
    )
}

/// 课时样例（带课程反向引用）
pub fn lesson_json(id: i64, course_id: i64) -> String {
    format!(
        r#"{{"Id": {id}, "Name": "A", "Chapter": {{"Id": 1, "Course": {{"Id": {course_id}, "SeriesId": 1}}}}}}"#
    )
}

/// 测验外壳样例
pub fn tests_json(id: i64) -> String {
    format!(
        r#"{{"Id": {id}, "Tests": [
            {{"Id": 1, "Category": "listening", "Tests": [{{"Id": 11}}, {{"Id": 12}}]}},
            {{"Id": 2, "Category": "reading", "Tests": []}}
        ]}}"#
    )
}
