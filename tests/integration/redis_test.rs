//! Redis集成测试
//!
//! 需要本地Redis服务器（redis://localhost:6379）。
//! 测试数据通过独立连接写入，目录本身只读。

use coursecache::catalog::CourseCatalog;
use coursecache::config::CatalogConfig;
use coursecache::error::CatalogError;
use coursecache::redis_storage::{RedisConfig, RedisStorage};
use coursecache::storage::Storage;
use std::sync::Arc;
use std::time::Duration;

const REDIS_URL: &str = "redis://localhost:6379";

async fn seed(pairs: &[(&str, String)]) {
    let client = redis::Client::open(REDIS_URL).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    for (key, value) in pairs {
        redis::cmd("SET")
            .arg(*key)
            .arg(value)
            .query_async::<_, ()>(&mut conn)
            .await
            .unwrap();
    }
}

async fn cleanup(keys: &[&str]) {
    let client = redis::Client::open(REDIS_URL).unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    for key in keys {
        redis::cmd("DEL")
            .arg(*key)
            .query_async::<_, ()>(&mut conn)
            .await
            .unwrap();
    }
}

/// 测试Redis连接
#[tokio::test]
#[ignore] // 需要Redis服务器运行
async fn test_redis_connection() {
    let config = RedisConfig::new(REDIS_URL).io_timeout(Duration::from_secs(1));
    let storage = RedisStorage::new(config).await.unwrap();

    assert!(storage.ping().await.is_ok());
}

/// 测试远程未命中
#[tokio::test]
#[ignore]
async fn test_redis_missing_key() {
    let storage = RedisStorage::new(RedisConfig::new(REDIS_URL)).await.unwrap();
    let value = storage.get("COURSE:-424242").await.unwrap();
    assert!(value.is_none());
}

/// 测试通过Redis的读穿流程
#[tokio::test]
#[ignore]
async fn test_redis_read_through() {
    seed(&[
        ("COURSE:990001", crate::common::course_json(990001)),
        ("LESSON:990101:COURSE_ID", "990001".to_string()),
    ])
    .await;

    let storage = RedisStorage::new(RedisConfig::new(REDIS_URL)).await.unwrap();
    let catalog = crate::common::create_test_catalog(Arc::new(storage));

    let course = catalog.course(990001).await.unwrap();
    assert_eq!(course.lesson_ids_in_order(), vec![101, 102, 103, 201]);
    assert_eq!(catalog.course_id_from_lesson(990101).await, 990001);

    // 远程删除后仍由本地缓存提供
    cleanup(&["COURSE:990001", "LESSON:990101:COURSE_ID"]).await;
    assert_eq!(catalog.course(990001).await.unwrap().id, 990001);
    assert_eq!(catalog.stats().remote_fetches(), 2);
}

/// 测试从配置连接
#[tokio::test]
#[ignore]
async fn test_connect_from_config() {
    let yaml = r#"
connection: course
connections:
  course:
    url: redis://localhost:6379
    io_timeout_ms: 500
fetch_timeout_ms: 1000
"#;
    let config = CatalogConfig::from_yaml_str(yaml).unwrap();
    let catalog = CourseCatalog::connect(&config).await.unwrap();

    let err = catalog.course(-424242).await.unwrap_err();
    assert!(matches!(err, CatalogError::RemoteMiss(_)));
}

/// 测试连接不可达的Redis
#[tokio::test]
#[ignore]
async fn test_unreachable_redis() {
    let config = RedisConfig::new("redis://127.0.0.1:1").connection_timeout(Duration::from_millis(200));
    assert!(RedisStorage::new(config).await.is_err());
}
