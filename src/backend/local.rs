//! In-process search backend / 本地搜索后端

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::{SearchBackend, SearchRequest};
use crate::error::SearchError;
use crate::matcher::Matcher;
use crate::models::SearchOutcome;

/// Runs the [`Matcher`] on tokio's blocking pool / 在阻塞线程池中运行匹配器
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalBackend {
    matcher: Matcher,
}

impl LocalBackend {
    pub fn new(matcher: Matcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Search on the current thread / 在当前线程同步搜索
    ///
    /// Elapsed time covers the scan only, not validation.
    pub fn search_blocking(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let cancel = request.cancel_flag();
        let started = Instant::now();
        let list = self.matcher.find_cancellable(
            &request.sequence,
            request.pattern.as_str(),
            request.allow_overlapping,
            &cancel,
        )?;
        let search_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        Ok(SearchOutcome {
            pattern: request.pattern.to_string(),
            algorithm_used: self.matcher.label().to_string(),
            search_time_ms,
            total_matches: list.matches.len(),
            matches: list.matches,
            truncated: list.truncated,
        })
    }
}

/// Sets the cancel flag if dropped before [`CancelOnDrop::disarm`] / 未完成即丢弃时取消扫描
struct CancelOnDrop(Option<Arc<AtomicBool>>);

impl CancelOnDrop {
    fn disarm(mut self) {
        self.0 = None;
    }
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(flag) = self.0.take() {
            flag.store(true, Ordering::Relaxed);
        }
    }
}

#[async_trait]
impl SearchBackend for LocalBackend {
    fn name(&self) -> &str {
        self.matcher.label()
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let backend = *self;
        let guard = CancelOnDrop(Some(request.cancel_flag()));
        let request = request.clone();
        let result = tokio::task::spawn_blocking(move || backend.search_blocking(&request)).await;
        guard.disarm();
        result.map_err(|e| SearchError::Internal(e.to_string()))?
    }
}
