//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 单飞加载器
//!
//! 同一键的并发远程读取只发出一次，其余请求等待并共享结果，防止缓存击穿。

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::trace;

use crate::error::StorageError;

type Slot<V> = watch::Sender<Option<Result<V, StorageError>>>;

/// 单飞加载器
pub struct SingleFlight<V> {
    /// 加载中的任务: key -> sender
    pending: DashMap<String, Slot<V>>,
    /// 被合并（未实际加载）的请求数
    coalesced: AtomicU64,
}

impl<V> Default for SingleFlight<V> {
    fn default() -> Self {
        Self {
            pending: DashMap::new(),
            coalesced: AtomicU64::new(0),
        }
    }
}

/// 加载中的角色
enum Role<V> {
    /// 负责发起加载
    Leader(Slot<V>),
    /// 等待加载方的结果
    Follower(watch::Receiver<Option<Result<V, StorageError>>>),
}

impl<V: Clone> SingleFlight<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载键对应的值；已有加载在进行时等待其结果
    ///
    /// 加载方被取消时，等待方收到 `TimeoutError`。
    pub async fn load<F, Fut>(&self, key: &str, loader: F) -> Result<V, StorageError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<V, StorageError>>,
    {
        let tx = match self.join(key) {
            Role::Leader(tx) => tx,
            Role::Follower(rx) => {
                trace!("等待其他请求加载 key={}", key);
                self.coalesced.fetch_add(1, Ordering::Relaxed);
                return Self::wait(rx, key).await;
            }
        };

        // 无论正常结束还是被取消都清理单飞条目
        let _cleanup = scopeguard::guard((), |_| {
            self.pending.remove(key);
        });

        let result = loader().await;
        Self::publish(&tx, &result);
        result
    }

    /// 登记为加载方，或订阅已有的加载
    ///
    /// 分片锁只在本函数内持有。
    fn join(&self, key: &str) -> Role<V> {
        match self.pending.entry(key.to_string()) {
            Entry::Occupied(entry) => Role::Follower(entry.get().subscribe()),
            Entry::Vacant(entry) => {
                let (tx, _) = watch::channel(None);
                entry.insert(tx.clone());
                Role::Leader(tx)
            }
        }
    }

    /// 发布结果
    ///
    /// 即使当前没有订阅者也保存结果，清理前才订阅的等待方仍能读到。
    fn publish(tx: &Slot<V>, result: &Result<V, StorageError>) {
        tx.send_replace(Some(result.clone()));
    }

    async fn wait(
        mut rx: watch::Receiver<Option<Result<V, StorageError>>>,
        key: &str,
    ) -> Result<V, StorageError> {
        if let Some(res) = rx.borrow_and_update().clone() {
            return res;
        }

        if rx.changed().await.is_ok() {
            if let Some(res) = rx.borrow().clone() {
                return res;
            }
        }

        Err(StorageError::TimeoutError(format!(
            "加载方未返回结果: {}",
            key
        )))
    }

    /// 当前进行中的加载数
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn coalesced(&self) -> u64 {
        self.coalesced.load(Ordering::Relaxed)
    }
}
