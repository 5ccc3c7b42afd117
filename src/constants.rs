//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Centralized configuration constants for the course cache.
//!
//! All magic numbers are defined here with their purpose and usage context.

// ============================================================================
// TTL Policy Constants
// ============================================================================

/// Local cache lifetime chosen during peak traffic windows (1 hour).
pub const PEAK_TTL_SECS: u64 = 3_600;

/// Local cache lifetime chosen outside peak windows (5 minutes).
pub const OFF_PEAK_TTL_SECS: u64 = 300;

/// Reference timezone for the peak window check, as a UTC offset in hours.
///
/// The catalog is served from a UTC+8 deployment.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

// ============================================================================
// Local Cache Constants
// ============================================================================

/// How often the background sweep purges expired local entries (10 minutes).
///
/// Only the read-time expiry check is load-bearing; the sweep bounds memory.
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 600;

// ============================================================================
// Remote Store Constants
// ============================================================================

/// Logical connection profile the catalog reads from.
pub const DEFAULT_CONNECTION_NAME: &str = "course";

/// Default connection and IO timeout for the remote store (milliseconds).
pub const DEFAULT_REDIS_TIMEOUT_MS: u64 = 3_000;

// ============================================================================
// Series Constants
// ============================================================================

/// Basic series of the main app, also the fallback for unknown apps.
pub const BASIC_SERIES_ID: i8 = 1;

/// AI app series.
pub const AI_SERIES_ID: i8 = 22;

/// Art app series.
pub const ART_SERIES_ID: i8 = 17;

/// Qluck series.
pub const QLUCK_SERIES_ID: i8 = 8;
