//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! 本地缓存TTL策略
//!
//! 访问量按时段呈双峰分布：高峰时段缓存1小时以减轻远程存储压力，
//! 其余时段缓存5分钟以保证数据新鲜。每次写入本地缓存时重新计算，
//! 已写入条目的TTL不会随策略变化。

use chrono::{FixedOffset, Offset, Timelike, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{DEFAULT_UTC_OFFSET_HOURS, OFF_PEAK_TTL_SECS, PEAK_TTL_SECS};

/// 判断小时（0-23）是否处于高峰时段
///
/// 高峰时段: [8,13]、[17,21]、23点及以后、5点及以前。
pub fn is_peak_hour(hour: u32) -> bool {
    (8..=13).contains(&hour) || (17..=21).contains(&hour) || hour >= 23 || hour <= 5
}

/// 按小时计算默认TTL
pub fn cache_duration_for_hour(hour: u32) -> Duration {
    if is_peak_hour(hour) {
        Duration::from_secs(PEAK_TTL_SECS)
    } else {
        Duration::from_secs(OFF_PEAK_TTL_SECS)
    }
}

/// 将小时偏移转换为固定时区，超出 ±23 小时返回None
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    if !(-23..=23).contains(&hours) {
        return None;
    }
    FixedOffset::east_opt(hours * 3600)
}

/// TTL策略接口
pub trait TtlPolicy: Send + Sync {
    /// 为一次新的本地缓存写入选择TTL
    fn ttl(&self) -> Duration;
}

/// 小时来源，返回参考时区下的小时（0-23）
pub type HourSource = Arc<dyn Fn() -> u32 + Send + Sync>;

/// 按挂钟时间区分高峰/非高峰的策略
#[derive(Clone)]
pub struct PeakHoursPolicy {
    /// 参考时区
    offset: FixedOffset,
    /// 高峰时段TTL
    peak_ttl: Duration,
    /// 非高峰时段TTL
    off_peak_ttl: Duration,
    /// 替代挂钟的小时来源
    hour_source: Option<HourSource>,
}

impl std::fmt::Debug for PeakHoursPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeakHoursPolicy")
            .field("offset", &self.offset)
            .field("peak_ttl", &self.peak_ttl)
            .field("off_peak_ttl", &self.off_peak_ttl)
            .field("hour_source", &self.hour_source.as_ref().map(|_| "custom"))
            .finish()
    }
}

impl Default for PeakHoursPolicy {
    fn default() -> Self {
        let offset = offset_from_hours(DEFAULT_UTC_OFFSET_HOURS).unwrap_or(Utc.fix());
        Self {
            offset,
            peak_ttl: Duration::from_secs(PEAK_TTL_SECS),
            off_peak_ttl: Duration::from_secs(OFF_PEAK_TTL_SECS),
            hour_source: None,
        }
    }
}

impl PeakHoursPolicy {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            ..Default::default()
        }
    }

    /// 设置高峰/非高峰TTL
    pub fn durations(mut self, peak_ttl: Duration, off_peak_ttl: Duration) -> Self {
        self.peak_ttl = peak_ttl;
        self.off_peak_ttl = off_peak_ttl;
        self
    }

    /// 用给定的小时来源代替挂钟，超过23的小时按24取模
    pub fn with_hour_source(mut self, source: impl Fn() -> u32 + Send + Sync + 'static) -> Self {
        self.hour_source = Some(Arc::new(source));
        self
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// 参考时区下的给定小时对应的TTL
    pub fn ttl_for_hour(&self, hour: u32) -> Duration {
        if is_peak_hour(hour) {
            self.peak_ttl
        } else {
            self.off_peak_ttl
        }
    }

    /// 参考时区下的当前小时
    pub fn current_hour(&self) -> u32 {
        match &self.hour_source {
            Some(source) => source() % 24,
            None => Utc::now().with_timezone(&self.offset).hour(),
        }
    }
}

impl TtlPolicy for PeakHoursPolicy {
    fn ttl(&self) -> Duration {
        self.ttl_for_hour(self.current_hour())
    }
}

/// 固定TTL策略
#[derive(Debug, Clone, Copy)]
pub struct FixedTtl(pub Duration);

impl TtlPolicy for FixedTtl {
    fn ttl(&self) -> Duration {
        self.0
    }
}
