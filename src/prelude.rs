//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Prelude module - Commonly used types for quick imports
//!
//! `use coursecache::prelude::*;` brings in the catalog, its options,
//! the entity types and the storage seam.

// Core types - always available
pub use crate::catalog::{CatalogOptions, CourseCatalog};
pub use crate::config::CatalogConfig;
pub use crate::error::{CatalogError, CatalogResult, StorageError};

// Entities
pub use crate::model::{Course, CourseBrief, Lesson, Test};

// Storage
pub use crate::storage::{MemoryStorage, Storage};

// TTL policies
pub use crate::ttl_policy::{FixedTtl, PeakHoursPolicy, TtlPolicy};

// Feature-gated exports
#[cfg(feature = "redis")]
pub use crate::redis_storage::{RedisConfig, RedisStorage};
