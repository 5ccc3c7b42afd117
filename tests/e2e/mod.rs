//! 端到端测试模块
//!
//! 通过公开接口测试完整的读穿流程

mod failures;
mod ttl_expiry;
