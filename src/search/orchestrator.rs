//! Search orchestrator / 搜索编排
//!
//! Per request: validate → local or remote execution → (remote may fall back
//! to local once, on transport failure only) → done.

use std::sync::Arc;

use crate::backend::{LocalBackend, RemoteBackend, SearchBackend, SearchRequest};
use crate::config::AppConfig;
use crate::error::{SearchError, ValidationError};
use crate::matcher::Matcher;
use crate::models::SearchOutcome;
use crate::validators::Pattern;

/// Single entry point for pattern searches / 搜索统一入口
#[derive(Clone)]
pub struct SearchOrchestrator {
    local: Arc<dyn SearchBackend>,
    remote: Option<Arc<dyn SearchBackend>>,
}

impl SearchOrchestrator {
    /// Local-only orchestrator / 仅本地搜索
    pub fn new(local: Arc<dyn SearchBackend>) -> Self {
        Self { local, remote: None }
    }

    /// Route searches to `remote`, keeping local as the fallback / 启用远程后端
    pub fn with_remote(mut self, remote: Arc<dyn SearchBackend>) -> Self {
        self.remote = Some(remote);
        self
    }

    /// Build from configuration / 根据配置创建
    ///
    /// Must be called inside a tokio runtime when the remote backend is enabled.
    pub fn from_config(config: &AppConfig) -> Result<Self, SearchError> {
        let matcher = Matcher::new(config.search.algorithm).with_max_matches(config.search.max_matches);
        let orchestrator = Self::new(Arc::new(LocalBackend::new(matcher)));

        if config.remote.enabled {
            let remote = RemoteBackend::new(&config.remote)?.with_max_matches(config.search.max_matches);
            tracing::info!("Remote search enabled at {}", remote.address());
            Ok(orchestrator.with_remote(Arc::new(remote)))
        } else {
            tracing::info!("Remote search disabled, using {}", matcher.label());
            Ok(orchestrator)
        }
    }

    pub fn is_remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Validate raw input into a request / 校验输入
    ///
    /// Shared by both execution paths so validation errors never depend on
    /// which backend would have run.
    pub fn prepare(
        sequence: impl Into<Arc<str>>,
        pattern: &str,
        allow_overlapping: bool,
    ) -> Result<SearchRequest, SearchError> {
        let sequence = sequence.into();
        let pattern = Pattern::parse(pattern)?;
        if sequence.is_empty() {
            return Err(ValidationError::EmptySequence.into());
        }
        Ok(SearchRequest::new(sequence, pattern, allow_overlapping))
    }

    /// Validate and run one search / 校验并执行搜索
    pub async fn search(
        &self,
        sequence: impl Into<Arc<str>>,
        pattern: &str,
        allow_overlapping: bool,
    ) -> Result<SearchOutcome, SearchError> {
        let request = Self::prepare(sequence, pattern, allow_overlapping)?;
        self.execute(&request).await
    }

    /// Run an already validated request / 执行已校验的请求
    pub async fn execute(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let Some(remote) = &self.remote else {
            tracing::debug!("Searching locally with {}", self.local.name());
            return self.local.search(request).await;
        };

        match remote.search(request).await {
            Ok(outcome) => Ok(outcome),
            Err(SearchError::Transport(e)) => {
                tracing::warn!("Remote search failed ({}), falling back to {}", e, self.local.name());
                self.local.search(request).await
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RemoteConfig;
    use crate::error::TransportError;
    use crate::matcher::Algorithm;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    enum Reply {
        Outcome,
        Transport,
        Backend,
    }

    /// Substitute remote backend / 模拟远程后端
    struct FakeRemote {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeRemote {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SearchBackend for FakeRemote {
        fn name(&self) -> &str {
            "fake"
        }

        async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Outcome => Ok(SearchOutcome {
                    pattern: request.pattern.to_string(),
                    algorithm_used: "KMP".to_string(),
                    search_time_ms: 0.1,
                    total_matches: 0,
                    matches: Vec::new(),
                    truncated: false,
                }),
                Reply::Transport => Err(TransportError::Timeout(Duration::from_secs(5)).into()),
                Reply::Backend => Err(SearchError::Backend("unexpected failure".to_string())),
            }
        }
    }

    fn local() -> Arc<dyn SearchBackend> {
        Arc::new(LocalBackend::default())
    }

    #[tokio::test]
    async fn test_local_search() {
        let orchestrator = SearchOrchestrator::new(local());
        assert!(!orchestrator.is_remote_enabled());

        let outcome = orchestrator.search("ATGATGATGATG", "ATG", true).await.unwrap();
        assert_eq!(outcome.algorithm_used, "naive-local");
        assert_eq!(outcome.total_matches, 4);
        assert_eq!(outcome.positions(), vec![0, 3, 6, 9]);
        assert_eq!(outcome.matches[0].context_before, "");
        assert_eq!(outcome.matches[0].context_after, "ATGATGATG");
        assert_eq!(outcome.matches[3].context_before, "ATGATGATG");
        assert_eq!(outcome.matches[3].context_after, "");
    }

    #[tokio::test]
    async fn test_single_match_context() {
        let orchestrator = SearchOrchestrator::new(local());
        let outcome = orchestrator.search("AAAAAAAAAATCGAAAAAAAAAA", "TCG", false).await.unwrap();
        assert_eq!(outcome.total_matches, 1);
        assert_eq!(outcome.matches[0].context_before, "AAAAAAAAAA");
        assert_eq!(outcome.matches[0].context_after, "AAAAAAAAAA");
    }

    #[tokio::test]
    async fn test_validation_runs_before_dispatch() {
        let remote = FakeRemote::new(Reply::Outcome);
        let orchestrator = SearchOrchestrator::new(local()).with_remote(remote.clone());

        let cases = [
            ("ATCG", "", ValidationError::EmptyPattern),
            ("ATCG", " \n ", ValidationError::EmptyPattern),
            ("ATCG", "AXG", ValidationError::InvalidCharacter { ch: 'X', position: 1 }),
            ("", "ATG", ValidationError::EmptySequence),
        ];
        for (seq, pat, expected) in cases {
            match orchestrator.search(seq, pat, true).await {
                Err(SearchError::Validation(e)) => assert_eq!(e, expected),
                other => panic!("expected validation error, got {:?}", other),
            }
        }

        let too_long = "A".repeat(1001);
        assert!(matches!(
            orchestrator.search("ATCG", &too_long, true).await,
            Err(SearchError::Validation(ValidationError::PatternTooLong { .. }))
        ));

        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_pattern_longer_than_sequence_is_not_an_error() {
        let orchestrator = SearchOrchestrator::new(local());
        let outcome = orchestrator.search("AT", "ATCGATCG", true).await.unwrap();
        assert_eq!(outcome.total_matches, 0);
        assert!(outcome.matches.is_empty());
    }

    #[tokio::test]
    async fn test_pattern_is_normalized() {
        let orchestrator = SearchOrchestrator::new(local());
        let outcome = orchestrator.search("ATCGATCG", " t c g ", true).await.unwrap();
        assert_eq!(outcome.pattern, "TCG");
        assert_eq!(outcome.total_matches, 2);
    }

    #[tokio::test]
    async fn test_remote_success_keeps_remote_label() {
        let remote = FakeRemote::new(Reply::Outcome);
        let orchestrator = SearchOrchestrator::new(local()).with_remote(remote.clone());

        let outcome = orchestrator.search("ATCG", "AT", true).await.unwrap();
        assert_eq!(outcome.algorithm_used, "KMP");
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_falls_back_to_local() {
        let remote = FakeRemote::new(Reply::Transport);
        let orchestrator = SearchOrchestrator::new(local()).with_remote(remote.clone());

        let outcome = orchestrator.search("AAAA", "AA", true).await.unwrap();
        let expected = SearchOrchestrator::new(local()).search("AAAA", "AA", true).await.unwrap();

        assert_eq!(outcome.algorithm_used, "naive-local");
        assert_eq!(outcome.total_matches, expected.total_matches);
        assert_eq!(outcome.matches, expected.matches);
        assert_eq!(outcome.positions(), vec![0, 1, 2]);
        // Exactly one remote attempt, no retries / 只尝试一次
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_label_follows_local_algorithm() {
        let local = Arc::new(LocalBackend::new(Matcher::new(Algorithm::Horspool)));
        let orchestrator = SearchOrchestrator::new(local).with_remote(FakeRemote::new(Reply::Transport));
        let outcome = orchestrator.search("AAAA", "AA", false).await.unwrap();
        assert_eq!(outcome.algorithm_used, "horspool-local");
        assert_eq!(outcome.positions(), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_non_transport_failure_propagates() {
        let remote = FakeRemote::new(Reply::Backend);
        let orchestrator = SearchOrchestrator::new(local()).with_remote(remote.clone());

        let result = orchestrator.search("ATCG", "AT", true).await;
        assert!(matches!(result, Err(SearchError::Backend(_))));
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_from_config() {
        let mut config = AppConfig::default();
        config.search.algorithm = Algorithm::Kmp;
        let orchestrator = SearchOrchestrator::from_config(&config).unwrap();
        assert!(!orchestrator.is_remote_enabled());
        let outcome = orchestrator.search("ATCG", "CG", true).await.unwrap();
        assert_eq!(outcome.algorithm_used, "kmp-local");

        config.remote = RemoteConfig {
            enabled: true,
            ..RemoteConfig::default()
        };
        assert!(SearchOrchestrator::from_config(&config).unwrap().is_remote_enabled());

        config.remote.host = "not a host".to_string();
        assert!(matches!(
            SearchOrchestrator::from_config(&config),
            Err(SearchError::Backend(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_searches() {
        let orchestrator = SearchOrchestrator::new(local()).with_remote(FakeRemote::new(Reply::Transport));
        let mut handles = Vec::new();
        for i in 0..16 {
            let orchestrator = orchestrator.clone();
            handles.push(tokio::spawn(async move {
                let seq = format!("{}ATG{}", "C".repeat(i), "C".repeat(i));
                orchestrator.search(seq, "ATG", true).await
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            let outcome = handle.await.unwrap().unwrap();
            assert_eq!(outcome.positions(), vec![i]);
        }
    }
}
