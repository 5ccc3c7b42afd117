//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Coursecache - Two-tier read-through cache for the course catalog
//!
//! Serves courses, lessons and tests from a per-process in-memory cache,
//! falling back to a shared remote key-value store on miss.
//!
//! # API Layers
//!
//! ## Prelude (Quick Start)
//!
//! Use `use coursecache::prelude::*;` to import all commonly used types.
//!
//! ## Core API
//!
//! - [`CourseCatalog`] - Read-through entry points
//! - [`CatalogConfig`] - Configuration loaded from YAML/TOML
//! - [`CatalogError`] - Error types
//!
//! ## Building blocks
//!
//! - [`LocalCache`] - Typed in-process cache with per-entry expiry
//! - [`TtlPolicy`] - Time-of-day aware TTL selection
//! - [`Storage`] - Remote store seam (Redis or in-memory)
//!
//! ## Extensions (feature-gated)
//!
//! - Redis storage (requires `redis` feature, on by default)
//! - Log subscriber initialiser (requires `telemetry` feature)
//!
//! # Examples
//!
//! ```rust
//! use coursecache::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = Arc::new(MemoryStorage::new());
//!     storage.insert("COURSES", r#"[{"Id": 1, "Level": 1, "SeriesId": 1}]"#);
//!
//!     // 启动时创建一次，进程内共享
//!     let catalog = CourseCatalog::new(storage);
//!
//!     let courses = catalog.courses_by_level_and_series(1, 0).await;
//!     assert_eq!(courses.len(), 1);
//! }
//! ```
//!
//! # Features
//!
//! - **Read-through**: local hit, remote fetch, decode, cache with a time-of-day TTL
//! - **Peak-hour TTL**: one hour during traffic peaks, five minutes otherwise
//! - **Typed entities**: PascalCase JSON documents decoded into owned structs
//! - **Optional single-flight**: coalesce concurrent remote reads of the same key

pub mod prelude;

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod keys;
pub mod local_cache;
pub mod model;
#[cfg(feature = "redis")]
pub mod redis_storage;
pub mod series;
pub mod single_flight;
pub mod storage;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod ttl_policy;

// 重新导出常用类型
pub use catalog::{CatalogOptions, CourseCatalog, ReadThroughStats};
pub use config::{CatalogConfig, LocalCacheSettings, RedisSettings, TtlSettings};
pub use error::{CatalogError, CatalogResult, StorageError};
pub use local_cache::{CacheStats, LocalCache, LocalCacheConfig};
pub use model::{
    ChapterCourse, ChapterLesson, Course, CourseBrief, CourseChapter, CourseTest, Lesson,
    LessonChapter, LessonTest, SubTest, Test,
};
#[cfg(feature = "redis")]
pub use redis_storage::{RedisConfig, RedisStorage};
pub use single_flight::SingleFlight;
pub use storage::{MemoryStorage, Storage};
#[cfg(feature = "telemetry")]
pub use telemetry::init_tracing;
pub use ttl_policy::{cache_duration_for_hour, FixedTtl, HourSource, PeakHoursPolicy, TtlPolicy};
