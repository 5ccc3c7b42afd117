//! 集成测试模块
//!
//! 测试课程目录与真实Redis的集成

#[cfg(feature = "redis")]
#[allow(unused_imports)]
mod redis_test;
