//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 课程目录读穿缓存
//!
//! 每个查询入口都遵循同一状态机：
//!
//! ```text
//! 本地命中 -> 返回
//! 本地未命中 -> 远程读取 -> 命中 -> 反序列化 -> 成功 -> 写入本地缓存 -> 返回
//!                                            -> 失败 -> 返回错误（不写入）
//!                       -> 未命中/出错 -> 返回错误
//! ```
//!
//! 远程不可用与数据损坏都不是致命错误，也不会重试：每次调用只尝试一次。
//! 测验查询把所有失败统一折叠为空列表。
//!
//! # 使用示例
//!
//! ```no_run
//! use coursecache::{CourseCatalog, MemoryStorage};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = Arc::new(MemoryStorage::new());
//!     storage.insert("COURSE:1", r#"{"Id": 1, "Chapters": []}"#);
//!
//!     let catalog = CourseCatalog::new(storage);
//!     let course = catalog.course(1).await.unwrap();
//!     assert_eq!(course.id, 1);
//! }
//! ```

use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

use crate::config::CatalogConfig;
use crate::error::{CatalogError, CatalogResult, StorageError};
use crate::keys;
use crate::local_cache::{LocalCache, LocalCacheConfig};
use crate::model::{Course, CourseBrief, CourseTest, Lesson, LessonTest, Test};
use crate::series;
use crate::single_flight::SingleFlight;
use crate::storage::Storage;
use crate::ttl_policy::{PeakHoursPolicy, TtlPolicy};

/// 读穿缓存选项
#[derive(Clone)]
pub struct CatalogOptions {
    /// TTL策略
    pub ttl_policy: Arc<dyn TtlPolicy>,
    /// 本地缓存配置
    pub local_cache: LocalCacheConfig,
    /// 单次远程读取的截止时间
    pub fetch_timeout: Option<Duration>,
    /// 是否合并同一键的并发远程读取
    pub single_flight: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            ttl_policy: Arc::new(PeakHoursPolicy::default()),
            local_cache: LocalCacheConfig::default(),
            fetch_timeout: None,
            single_flight: false,
        }
    }
}

impl std::fmt::Debug for CatalogOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogOptions")
            .field("local_cache", &self.local_cache)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("single_flight", &self.single_flight)
            .finish()
    }
}

impl CatalogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ttl_policy(mut self, policy: impl TtlPolicy + 'static) -> Self {
        self.ttl_policy = Arc::new(policy);
        self
    }

    pub fn local_cache(mut self, config: LocalCacheConfig) -> Self {
        self.local_cache = config;
        self
    }

    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn single_flight(mut self, enabled: bool) -> Self {
        self.single_flight = enabled;
        self
    }

    /// 从配置文件结构生成选项
    pub fn from_config(config: &CatalogConfig) -> CatalogResult<Self> {
        config.validate()?;
        Ok(Self {
            ttl_policy: Arc::new(config.ttl_policy()?),
            local_cache: config.local_cache_config(),
            fetch_timeout: config.fetch_timeout(),
            single_flight: config.single_flight,
        })
    }
}

/// 读穿统计
#[derive(Debug, Default)]
pub struct ReadThroughStats {
    /// 本地命中次数
    local_hits: AtomicU64,
    /// 实际发出的远程读取次数
    remote_fetches: AtomicU64,
    /// 远程命中次数
    remote_hits: AtomicU64,
    /// 远程未命中次数
    remote_misses: AtomicU64,
    /// 远程出错次数
    remote_errors: AtomicU64,
    /// 反序列化失败次数
    decode_failures: AtomicU64,
}

impl ReadThroughStats {
    pub fn local_hits(&self) -> u64 {
        self.local_hits.load(Ordering::Relaxed)
    }

    pub fn remote_fetches(&self) -> u64 {
        self.remote_fetches.load(Ordering::Relaxed)
    }

    pub fn remote_hits(&self) -> u64 {
        self.remote_hits.load(Ordering::Relaxed)
    }

    pub fn remote_misses(&self) -> u64 {
        self.remote_misses.load(Ordering::Relaxed)
    }

    pub fn remote_errors(&self) -> u64 {
        self.remote_errors.load(Ordering::Relaxed)
    }

    pub fn decode_failures(&self) -> u64 {
        self.decode_failures.load(Ordering::Relaxed)
    }

    /// 本地命中率（相对于全部查询）
    pub fn local_hit_rate(&self) -> f64 {
        let total = self.local_hits()
            + self.remote_hits()
            + self.remote_misses()
            + self.remote_errors();
        if total == 0 {
            0.0
        } else {
            self.local_hits() as f64 / total as f64
        }
    }

    pub fn reset(&self) {
        self.local_hits.store(0, Ordering::Relaxed);
        self.remote_fetches.store(0, Ordering::Relaxed);
        self.remote_hits.store(0, Ordering::Relaxed);
        self.remote_misses.store(0, Ordering::Relaxed);
        self.remote_errors.store(0, Ordering::Relaxed);
        self.decode_failures.store(0, Ordering::Relaxed);
    }
}

/// 课程目录读穿缓存
///
/// 服务启动时创建一次，整个进程生命周期内共享（通常放在 `Arc` 中）。
/// 每种实体一个类型化的本地缓存。
pub struct CourseCatalog {
    /// 远程存储
    storage: Arc<dyn Storage>,
    /// TTL策略
    ttl_policy: Arc<dyn TtlPolicy>,
    /// 完整课程列表
    courses: LocalCache<Arc<Vec<CourseBrief>>>,
    /// 单个课程
    course_cache: LocalCache<Arc<Course>>,
    /// 单个课时
    lesson_cache: LocalCache<Arc<Lesson>>,
    /// 课程测验
    course_tests_cache: LocalCache<Arc<CourseTest>>,
    /// 课时测验
    lesson_tests_cache: LocalCache<Arc<LessonTest>>,
    /// 课时 -> 课程ID
    lesson_course_ids: LocalCache<i64>,
    /// 单飞加载器（未启用时为None）
    single_flight: Option<SingleFlight<Option<String>>>,
    /// 远程读取截止时间
    fetch_timeout: Option<Duration>,
    /// 统计信息
    stats: Arc<ReadThroughStats>,
}

impl CourseCatalog {
    /// 使用默认选项创建
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_options(storage, CatalogOptions::default())
    }

    /// 使用选项创建
    pub fn with_options(storage: Arc<dyn Storage>, options: CatalogOptions) -> Self {
        info!(
            "创建课程目录缓存, single_flight={}, fetch_timeout={:?}",
            options.single_flight, options.fetch_timeout
        );

        let local = &options.local_cache;
        Self {
            storage,
            ttl_policy: options.ttl_policy,
            courses: LocalCache::with_config(local.clone()),
            course_cache: LocalCache::with_config(local.clone()),
            lesson_cache: LocalCache::with_config(local.clone()),
            course_tests_cache: LocalCache::with_config(local.clone()),
            lesson_tests_cache: LocalCache::with_config(local.clone()),
            lesson_course_ids: LocalCache::with_config(local.clone()),
            single_flight: options.single_flight.then(SingleFlight::new),
            fetch_timeout: options.fetch_timeout,
            stats: Arc::new(ReadThroughStats::default()),
        }
    }

    /// 使用配置文件结构创建
    pub fn from_config(config: &CatalogConfig, storage: Arc<dyn Storage>) -> CatalogResult<Self> {
        Ok(Self::with_options(storage, CatalogOptions::from_config(config)?))
    }

    /// 连接配置中选中的Redis档案并创建
    #[cfg(feature = "redis")]
    pub async fn connect(config: &CatalogConfig) -> CatalogResult<Self> {
        let storage = crate::redis_storage::RedisStorage::new(config.redis_config()?).await?;
        Self::from_config(config, Arc::new(storage))
    }

    // ------------------------------------------------------------------
    // 读穿核心
    // ------------------------------------------------------------------

    /// 单次远程读取，受截止时间约束
    async fn fetch_once(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.stats.remote_fetches.fetch_add(1, Ordering::Relaxed);
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.storage.get(key))
                .await
                .map_err(|_| {
                    StorageError::TimeoutError(format!("远程读取超过 {:?}: {}", limit, key))
                })?,
            None => self.storage.get(key).await,
        }
    }

    async fn fetch_remote(&self, key: &str) -> Result<Option<String>, StorageError> {
        match &self.single_flight {
            Some(flight) => flight.load(key, || self.fetch_once(key)).await,
            None => self.fetch_once(key).await,
        }
    }

    /// 读取远程原始文本，未命中与出错都转换为错误
    async fn load_text(&self, key: &str) -> CatalogResult<String> {
        match self.fetch_remote(key).await {
            Ok(Some(text)) => {
                self.stats.remote_hits.fetch_add(1, Ordering::Relaxed);
                debug!("远程命中: key={}", key);
                Ok(text)
            }
            Ok(None) => {
                self.stats.remote_misses.fetch_add(1, Ordering::Relaxed);
                debug!("远程未命中: key={}", key);
                Err(CatalogError::RemoteMiss(key.to_string()))
            }
            Err(e) => {
                self.stats.remote_errors.fetch_add(1, Ordering::Relaxed);
                warn!("远程读取失败: key={}, error={}", key, e);
                Err(e.into())
            }
        }
    }

    /// 读穿获取并缓存一个JSON实体
    ///
    /// 只有完整反序列化成功的值才会写入本地缓存。
    async fn read_through<T>(&self, cache: &LocalCache<Arc<T>>, key: &str) -> CatalogResult<Arc<T>>
    where
        T: DeserializeOwned + Send + Sync + 'static,
    {
        if let Some(value) = cache.get(key) {
            self.stats.local_hits.fetch_add(1, Ordering::Relaxed);
            trace!("本地缓存命中: key={}", key);
            return Ok(value);
        }

        let text = self.load_text(key).await?;
        let value: T = serde_json::from_str(&text).map_err(|source| {
            self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
            warn!("远程值反序列化失败: key={}, error={}", key, source);
            CatalogError::Decode {
                key: key.to_string(),
                source,
            }
        })?;

        let value = Arc::new(value);
        let ttl = self.ttl_policy.ttl();
        cache.set(key, Arc::clone(&value), ttl);
        debug!("写入本地缓存: key={}, ttl={:?}", key, ttl);
        Ok(value)
    }

    // ------------------------------------------------------------------
    // 课程列表
    // ------------------------------------------------------------------

    /// 完整课程列表
    pub async fn courses(&self) -> CatalogResult<Arc<Vec<CourseBrief>>> {
        self.read_through(&self.courses, keys::COURSES_KEY).await
    }

    /// 按级别与系列过滤课程；`series_id <= 0` 表示不限系列
    ///
    /// 获取课程列表失败时返回空列表。
    pub async fn courses_by_level_and_series(&self, level: i8, series_id: i8) -> Vec<CourseBrief> {
        match self.courses().await {
            Ok(courses) => series::filter_by_level_and_series(&courses, level, series_id),
            Err(_) => Vec::new(),
        }
    }

    /// 课程摘要
    pub async fn course_brief(&self, course_id: i64) -> Option<CourseBrief> {
        let courses = self.courses().await.ok()?;
        series::find_brief(&courses, course_id)
    }

    /// 课程ID集合对应的系列ID，去重并保持课程列表中首次出现的顺序
    pub async fn series_ids(&self, course_ids: &[i64]) -> Vec<i8> {
        if course_ids.is_empty() {
            return Vec::new();
        }
        match self.courses().await {
            Ok(courses) => series::series_ids_of(&courses, course_ids),
            Err(_) => Vec::new(),
        }
    }

    /// 系列下的课程ID
    pub async fn course_ids_for_series(&self, series_id: i8) -> Vec<i64> {
        match self.courses().await {
            Ok(courses) => series::course_ids_in_series(&courses, series_id),
            Err(_) => Vec::new(),
        }
    }

    /// 应用ID对应的基础系列ID
    pub fn app_basic_series_id(app_id: i8) -> i8 {
        series::app_basic_series_id(app_id)
    }

    // ------------------------------------------------------------------
    // 课程与课时
    // ------------------------------------------------------------------

    /// 单个课程
    ///
    /// 失败时调用方可用 `unwrap_or_default()` 得到零ID占位对象。
    pub async fn course(&self, course_id: i64) -> CatalogResult<Arc<Course>> {
        self.read_through(&self.course_cache, &keys::course_key(course_id))
            .await
    }

    /// 单个课时
    pub async fn lesson(&self, lesson_id: i64) -> CatalogResult<Arc<Lesson>> {
        self.read_through(&self.lesson_cache, &keys::lesson_key(lesson_id))
            .await
    }

    /// 课时所属课程ID，无法确定时返回0
    pub async fn course_id_from_lesson(&self, lesson_id: i64) -> i64 {
        match self.try_course_id_from_lesson(lesson_id).await {
            Ok(course_id) => course_id,
            Err(e) => {
                debug!("无法获取课时所属课程: lesson_id={}, error={}", lesson_id, e);
                0
            }
        }
    }

    /// 课时所属课程ID
    ///
    /// 远程值是纯文本整数。只有解析出正整数时才写入本地缓存。
    pub async fn try_course_id_from_lesson(&self, lesson_id: i64) -> CatalogResult<i64> {
        let key = keys::lesson_course_id_key(lesson_id);
        if let Some(course_id) = self.lesson_course_ids.get(&key) {
            self.stats.local_hits.fetch_add(1, Ordering::Relaxed);
            trace!("本地缓存命中: key={}", key);
            return Ok(course_id);
        }

        let text = self.load_text(&key).await?;
        let course_id = match text.trim().parse::<i64>() {
            Ok(course_id) if course_id > 0 => course_id,
            _ => {
                self.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
                warn!("课程ID映射值无效: key={}, value={:?}", key, text);
                return Err(CatalogError::InvalidCourseId { key, value: text });
            }
        };

        let ttl = self.ttl_policy.ttl();
        self.lesson_course_ids.set(&key, course_id, ttl);
        debug!("写入本地缓存: key={}, ttl={:?}", key, ttl);
        Ok(course_id)
    }

    // ------------------------------------------------------------------
    // 测验
    // ------------------------------------------------------------------

    /// 课程测验；任何失败都返回空列表
    pub async fn course_tests(&self, course_id: i64) -> Vec<Test> {
        match self
            .read_through(&self.course_tests_cache, &keys::course_tests_key(course_id))
            .await
        {
            Ok(envelope) => envelope.tests.clone(),
            Err(e) => {
                log_swallowed("课程测验", course_id, &e);
                Vec::new()
            }
        }
    }

    /// 课时测验；任何失败都返回空列表
    pub async fn lesson_tests(&self, lesson_id: i64) -> Vec<Test> {
        match self
            .read_through(&self.lesson_tests_cache, &keys::lesson_tests_key(lesson_id))
            .await
        {
            Ok(envelope) => envelope.tests.clone(),
            Err(e) => {
                log_swallowed("课时测验", lesson_id, &e);
                Vec::new()
            }
        }
    }

    // ------------------------------------------------------------------
    // 管理
    // ------------------------------------------------------------------

    /// 获取统计信息
    pub fn stats(&self) -> &ReadThroughStats {
        &self.stats
    }

    /// 当前本地缓存中的条目总数（含尚未清理的过期条目）
    pub fn local_entries(&self) -> usize {
        self.courses.len()
            + self.course_cache.len()
            + self.lesson_cache.len()
            + self.course_tests_cache.len()
            + self.lesson_tests_cache.len()
            + self.lesson_course_ids.len()
    }

    /// 停止所有本地缓存的后台清理任务
    pub fn shutdown(&self) {
        self.courses.shutdown();
        self.course_cache.shutdown();
        self.lesson_cache.shutdown();
        self.course_tests_cache.shutdown();
        self.lesson_tests_cache.shutdown();
        self.lesson_course_ids.shutdown();
    }
}

fn log_swallowed(what: &str, id: i64, error: &CatalogError) {
    match error {
        CatalogError::RemoteMiss(_) => debug!("{}不存在: id={}", what, id),
        _ => warn!("{}获取失败，按无测验处理: id={}, error={}", what, id, error),
    }
}

impl std::fmt::Debug for CourseCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourseCatalog")
            .field("local_entries", &self.local_entries())
            .field("single_flight", &self.single_flight.is_some())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}
