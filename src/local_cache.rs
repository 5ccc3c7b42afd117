//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 本地缓存实现
//!
//! 进程内按键过期的类型化缓存，使用DashMap支持并发读写。
//!
//! # 特性
//!
//! - **类型安全**: 每种实体一个 `LocalCache<V>`，读取时无需向下转型
//! - **按条目TTL**: 每次写入各自携带过期时间，读取时检查，过期即删除
//! - **后台清理**: 周期性清除过期条目，限制内存占用
//! - **整体替换**: 条目只会被整体覆盖，不会原地修改
//!
//! # 使用示例
//!
//! ```no_run
//! use coursecache::local_cache::LocalCache;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache: LocalCache<u32> = LocalCache::new(Duration::from_secs(600));
//!
//!     cache.set("LESSON:7:COURSE_ID", 3, Duration::from_secs(300));
//!
//!     if let Some(course_id) = cache.get("LESSON:7:COURSE_ID") {
//!         println!("course: {}", course_id);
//!     }
//! }
//! ```

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::constants::DEFAULT_CLEANUP_INTERVAL_SECS;

/// 缓存条目
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// 缓存值
    pub value: V,
    /// 过期时间
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    /// 创建新的缓存条目
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// 检查是否过期
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// 本地缓存配置
#[derive(Debug, Clone)]
pub struct LocalCacheConfig {
    /// 清理间隔
    pub cleanup_interval: Duration,
}

impl Default for LocalCacheConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
        }
    }
}

impl LocalCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cleanup_interval(mut self, interval: Duration) -> Self {
        self.cleanup_interval = interval;
        self
    }
}

/// 缓存统计信息
#[derive(Debug, Default)]
pub struct CacheStats {
    /// 命中次数
    hits: AtomicU64,
    /// 未命中次数（含过期）
    misses: AtomicU64,
    /// 过期次数
    expirations: AtomicU64,
    /// 写入次数
    writes: AtomicU64,
}

impl CacheStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn expirations(&self) -> u64 {
        self.expirations.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits() as f64 / total as f64
        }
    }
}

type Entries<V> = DashMap<String, CacheEntry<V>>;

/// 本地缓存实现
pub struct LocalCache<V> {
    /// 缓存数据
    data: Arc<Entries<V>>,
    /// 配置
    config: LocalCacheConfig,
    /// 统计信息
    stats: Arc<CacheStats>,
    /// 清理任务句柄（无tokio运行时时为None）
    cleanup_handle: Option<JoinHandle<()>>,
}

impl<V> LocalCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// 创建新的本地缓存
    ///
    /// # 参数
    ///
    /// * `cleanup_interval` - 后台清理间隔
    pub fn new(cleanup_interval: Duration) -> Self {
        Self::with_config(LocalCacheConfig { cleanup_interval })
    }

    /// 使用配置创建本地缓存
    pub fn with_config(config: LocalCacheConfig) -> Self {
        let data = Arc::new(DashMap::new());
        let stats = Arc::new(CacheStats::default());
        let cleanup_handle = Self::start_cleanup_task(
            Arc::downgrade(&data),
            Arc::clone(&stats),
            config.cleanup_interval,
        );

        Self {
            data,
            config,
            stats,
            cleanup_handle,
        }
    }

    /// 启动清理任务
    ///
    /// 任务只持有弱引用，缓存释放后自行退出。
    fn start_cleanup_task(
        data: Weak<Entries<V>>,
        stats: Arc<CacheStats>,
        interval: Duration,
    ) -> Option<JoinHandle<()>> {
        if interval.is_zero() {
            return None;
        }
        let handle = tokio::runtime::Handle::try_current().ok()?;
        Some(handle.spawn(async move {
            let mut cleanup_interval = tokio::time::interval(interval);
            // 首次tick立即完成，跳过
            cleanup_interval.tick().await;
            loop {
                cleanup_interval.tick().await;
                let Some(data) = data.upgrade() else {
                    break;
                };
                let purged = purge_expired(&data, &stats);
                if purged > 0 {
                    debug!("后台清理了 {} 条过期数据", purged);
                }
            }
        }))
    }

    /// 获取值
    ///
    /// 条目过期时视为不存在，并顺带删除。
    pub fn get(&self, key: &str) -> Option<V> {
        if let Some(entry) = self.data.get(key) {
            if !entry.is_expired() {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
        } else {
            self.stats.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        // 读锁已释放，再次确认后删除，避免误删并发写入的新值
        if self
            .data
            .remove_if(key, |_, entry| entry.is_expired())
            .is_some()
        {
            self.stats.expirations.fetch_add(1, Ordering::Relaxed);
            trace!("本地缓存条目过期: key={}", key);
        }
        self.stats.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// 设置值，覆盖已有条目
    pub fn set(&self, key: &str, value: V, ttl: Duration) {
        self.data
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// 删除值
    pub fn remove(&self, key: &str) -> Option<V> {
        self.data.remove(key).map(|(_, entry)| entry.value)
    }

    /// 检查键是否存在且未过期
    pub fn contains(&self, key: &str) -> bool {
        self.data
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// 清空缓存
    pub fn clear(&self) {
        self.data.clear();
    }

    /// 获取缓存大小（含尚未清理的过期条目）
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// 检查缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 清理过期数据
    pub fn cleanup_expired(&self) -> usize {
        let count = purge_expired(&self.data, &self.stats);
        if count > 0 {
            debug!("清理了 {} 条过期数据", count);
        }
        count
    }

    /// 获取统计信息
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// 获取配置
    pub fn config(&self) -> &LocalCacheConfig {
        &self.config
    }

    /// 停止清理任务
    pub fn shutdown(&self) {
        if let Some(handle) = &self.cleanup_handle {
            handle.abort();
        }
    }
}

fn purge_expired<V>(data: &Entries<V>, stats: &CacheStats) -> usize {
    let mut count = 0;
    data.retain(|_, entry| {
        if entry.is_expired() {
            count += 1;
            false
        } else {
            true
        }
    });
    stats
        .expirations
        .fetch_add(count as u64, Ordering::Relaxed);
    count
}

impl<V> Drop for LocalCache<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.cleanup_handle.take() {
            handle.abort();
        }
    }
}

impl<V> std::fmt::Debug for LocalCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalCache")
            .field("len", &self.data.len())
            .field("config", &self.config)
            .finish()
    }
}
