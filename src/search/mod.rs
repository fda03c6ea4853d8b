//! Search module - the entry point callers use / 搜索模块
//!
//! Call direction: caller → orchestrator → backend (unidirectional) / 调用方向

pub mod orchestrator;

pub use orchestrator::SearchOrchestrator;
