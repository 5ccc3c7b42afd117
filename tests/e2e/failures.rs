//! 失败路径测试
//!
//! 远程不可用、未命中和数据损坏都不会写入本地缓存。

use crate::common::*;
use coursecache::error::CatalogError;
use std::sync::Arc;

#[tokio::test]
async fn test_remote_unavailable_is_not_cached() {
    let storage = Arc::new(FailingStorage::new());
    let catalog = create_test_catalog(storage.clone());

    let err = catalog.course(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::RemoteUnavailable(_)));
    assert!(err.is_remote());

    assert!(catalog.course(1).await.is_err());
    assert_eq!(storage.calls(), 2);
    assert_eq!(catalog.stats().remote_errors(), 2);
    assert_eq!(catalog.local_entries(), 0);
}

#[tokio::test]
async fn test_malformed_payload_is_retried_from_remote() {
    let storage = Arc::new(CountingStorage::new());
    storage.insert("COURSE:7", r#"{"Id": "seven"}"#);
    let catalog = create_test_catalog(storage.clone());

    let err = catalog.course(7).await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode { ref key, .. } if key == "COURSE:7"));

    // 修复远程数据后下一次调用即可成功
    storage.insert("COURSE:7", &course_json(7));
    let course = catalog.course(7).await.unwrap();
    assert_eq!(course.id, 7);
    assert_eq!(storage.calls(), 2);
}

#[tokio::test]
async fn test_missing_entity_yields_placeholder() {
    let storage = Arc::new(CountingStorage::new());
    let catalog = create_test_catalog(storage);

    let course = catalog
        .course(42)
        .await
        .map(|c| (*c).clone())
        .unwrap_or_default();
    assert!(course.is_placeholder());
    assert!(course.lesson_ids_in_order().is_empty());

    let lesson = catalog
        .lesson(42)
        .await
        .map(|l| (*l).clone())
        .unwrap_or_default();
    assert!(lesson.is_placeholder());
    assert_eq!(lesson.course_id(), 0);
}

#[tokio::test]
async fn test_tests_lookup_is_empty_on_any_failure() {
    let failing = create_test_catalog(Arc::new(FailingStorage::new()));
    assert!(failing.course_tests(1).await.is_empty());
    assert!(failing.lesson_tests(1).await.is_empty());

    let storage = Arc::new(CountingStorage::new());
    storage.insert("COURSE:1:TESTS", "{not json");
    let catalog = create_test_catalog(storage);
    assert!(catalog.course_tests(1).await.is_empty());
    assert!(catalog.course_tests(2).await.is_empty());
}

#[tokio::test]
async fn test_course_list_failure_degrades_to_empty() {
    let catalog = create_test_catalog(Arc::new(FailingStorage::new()));
    assert!(catalog.courses_by_level_and_series(1, 0).await.is_empty());
    assert!(catalog.course_brief(1).await.is_none());
    assert!(catalog.series_ids(&[1]).await.is_empty());
    assert!(catalog.courses().await.is_err());
}

#[tokio::test]
async fn test_invalid_course_id_mapping() {
    let storage = Arc::new(CountingStorage::new());
    storage.insert("LESSON:5:COURSE_ID", "-3");
    storage.insert("LESSON:6:COURSE_ID", " 12 ");
    let catalog = create_test_catalog(storage.clone());

    assert_eq!(catalog.course_id_from_lesson(5).await, 0);
    assert!(matches!(
        catalog.try_course_id_from_lesson(5).await,
        Err(CatalogError::InvalidCourseId { .. })
    ));
    assert_eq!(catalog.course_id_from_lesson(6).await, 12);
    assert!(matches!(
        catalog.try_course_id_from_lesson(404).await,
        Err(CatalogError::RemoteMiss(_))
    ));
}
