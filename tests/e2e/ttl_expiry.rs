//! 本地缓存过期测试
//!
//! 使用暂停的tokio时钟推进时间。

use crate::common::*;
use coursecache::catalog::{CatalogOptions, CourseCatalog};
use coursecache::ttl_policy::PeakHoursPolicy;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// 使用高峰时段策略、小时由测试控制的目录
fn catalog_at_hour(storage: Arc<CountingStorage>, hour: Arc<AtomicU32>) -> CourseCatalog {
    let policy = PeakHoursPolicy::default().with_hour_source(move || hour.load(Ordering::SeqCst));
    CourseCatalog::with_options(storage, CatalogOptions::new().ttl_policy(policy))
}

async fn assert_expires_after(hour: u32, ttl: Duration) {
    let storage = Arc::new(CountingStorage::new());
    storage.insert("COURSE:7", &course_json(7));
    let catalog = catalog_at_hour(storage.clone(), Arc::new(AtomicU32::new(hour)));

    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 1);

    tokio::time::advance(ttl - Duration::from_secs(1)).await;
    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 1, "hour {} should still hit locally", hour);

    tokio::time::advance(Duration::from_secs(1)).await;
    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 2, "hour {} should refetch at ttl", hour);
}

#[tokio::test(start_paused = true)]
async fn test_peak_hour_entry_lives_one_hour() {
    assert_expires_after(8, Duration::from_secs(3600)).await;
}

#[tokio::test(start_paused = true)]
async fn test_off_peak_hour_entry_lives_five_minutes() {
    assert_expires_after(14, Duration::from_secs(300)).await;
}

#[tokio::test(start_paused = true)]
async fn test_late_night_hours_are_peak() {
    assert_expires_after(23, Duration::from_secs(3600)).await;
    assert_expires_after(5, Duration::from_secs(3600)).await;
    assert_expires_after(22, Duration::from_secs(300)).await;
}

#[tokio::test(start_paused = true)]
async fn test_ttl_is_chosen_at_populate_time() {
    let storage = Arc::new(CountingStorage::new());
    storage.insert("COURSE:7", &course_json(7));
    let hour = Arc::new(AtomicU32::new(14));
    let catalog = catalog_at_hour(storage.clone(), Arc::clone(&hour));

    // 非高峰写入，之后进入高峰不会延长已有条目
    catalog.course(7).await.unwrap();
    hour.store(8, Ordering::SeqCst);
    tokio::time::advance(Duration::from_secs(300)).await;
    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 2);

    // 本次写入发生在高峰时段
    tokio::time::advance(Duration::from_secs(3599)).await;
    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 2);

    tokio::time::advance(Duration::from_secs(1)).await;
    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_entry_expires_exactly_at_ttl() {
    let storage = Arc::new(CountingStorage::new());
    storage.insert("COURSE:7", &course_json(7));
    let catalog = catalog_with_ttl(storage.clone(), Duration::from_secs(300));

    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 1);

    tokio::time::advance(Duration::from_secs(299)).await;
    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    catalog.course(7).await.unwrap();
    assert_eq!(storage.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_expired_entry_picks_up_remote_change() {
    let storage = Arc::new(CountingStorage::new());
    storage.insert("LESSON:5:COURSE_ID", "7");
    let catalog = catalog_with_ttl(storage.clone(), Duration::from_secs(3600));

    assert_eq!(catalog.course_id_from_lesson(5).await, 7);

    storage.insert("LESSON:5:COURSE_ID", "8");
    assert_eq!(catalog.course_id_from_lesson(5).await, 7);

    tokio::time::advance(Duration::from_secs(3600)).await;
    assert_eq!(catalog.course_id_from_lesson(5).await, 8);
}

#[tokio::test(start_paused = true)]
async fn test_each_key_keeps_its_own_deadline() {
    let storage = Arc::new(CountingStorage::new());
    storage.insert("COURSE:1", &course_json(1));
    storage.insert("COURSE:2", &course_json(2));
    let catalog = catalog_with_ttl(storage.clone(), Duration::from_secs(300));

    catalog.course(1).await.unwrap();
    tokio::time::advance(Duration::from_secs(200)).await;
    catalog.course(2).await.unwrap();
    tokio::time::advance(Duration::from_secs(100)).await;

    // 课程1到期，课程2仍有效
    catalog.course(1).await.unwrap();
    catalog.course(2).await.unwrap();
    assert_eq!(storage.calls(), 3);
}
