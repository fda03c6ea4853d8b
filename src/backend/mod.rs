//! Search backends / 搜索后端
//!
//! The orchestrator only talks to [`SearchBackend`]; which implementation
//! runs (in-process matcher or remote gRPC service) is decided by configuration.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SearchError;
use crate::models::SearchOutcome;
use crate::validators::Pattern;

pub mod local;
pub mod remote;

pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// One validated search request / 已校验的搜索请求
///
/// The sequence is shared so a fallback can reuse it without copying.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub sequence: Arc<str>,
    pub pattern: Pattern,
    pub allow_overlapping: bool,
    cancel: Arc<AtomicBool>,
}

impl SearchRequest {
    pub fn new(sequence: impl Into<Arc<str>>, pattern: Pattern, allow_overlapping: bool) -> Self {
        Self {
            sequence: sequence.into(),
            pattern,
            allow_overlapping,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that abandons the local scan when set / 取消标志
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }
}

/// Search backend interface (primitive operation only) / 搜索后端接口
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Backend name for logs / 后端名称
    fn name(&self) -> &str;

    /// Run one search / 执行一次搜索
    ///
    /// Failures reaching the backend must be returned as
    /// [`SearchError::Transport`] so the orchestrator can fall back.
    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError>;
}
