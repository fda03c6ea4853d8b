//! Remote gRPC search backend / 远程 gRPC 搜索后端

use async_trait::async_trait;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

use super::{SearchBackend, SearchRequest};
use crate::config::RemoteConfig;
use crate::error::{SearchError, TransportError};
use crate::matcher::DEFAULT_MAX_MATCHES;
use crate::models::SearchOutcome;
use crate::rpc::{self, proto, DnaSearchClient};

/// Client for the remote `dna.DnaSearch` service / 远程搜索客户端
///
/// The channel connects lazily and is cloned per call, so one backend can
/// serve any number of concurrent searches.
#[derive(Debug, Clone)]
pub struct RemoteBackend {
    client: DnaSearchClient<Channel>,
    address: String,
    timeout: Duration,
    max_matches: Option<usize>,
}

impl RemoteBackend {
    /// Build the client from configuration / 根据配置创建客户端
    ///
    /// Must be called inside a tokio runtime. No connection is made until the
    /// first search. An invalid endpoint is a configuration error, not a
    /// transport error.
    pub fn new(config: &RemoteConfig) -> Result<Self, SearchError> {
        config.validate().map_err(|e| SearchError::Backend(e.to_string()))?;
        let endpoint = Endpoint::from_shared(config.endpoint())
            .map_err(|e| SearchError::Backend(format!("invalid remote endpoint {}: {}", config.endpoint(), e)))?
            .connect_timeout(config.connect_timeout())
            .timeout(config.timeout());

        let client = DnaSearchClient::new(endpoint.connect_lazy())
            .max_decoding_message_size(config.max_message_bytes)
            .max_encoding_message_size(config.max_message_bytes);

        Ok(Self {
            client,
            address: config.address(),
            timeout: config.timeout(),
            max_matches: Some(DEFAULT_MAX_MATCHES),
        })
    }

    /// Cap applied to remote results, `None` for unbounded / 远程结果的匹配上限
    ///
    /// Sent with each call and enforced again on the response, so remote and
    /// local searches report the same matches and the same `truncated` flag.
    pub fn with_max_matches(mut self, max_matches: Option<usize>) -> Self {
        self.max_matches = max_matches;
        self
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    fn classify(&self, status: tonic::Status) -> TransportError {
        match status.code() {
            tonic::Code::Unavailable => TransportError::Unreachable {
                address: self.address.clone(),
                message: status.message().to_string(),
            },
            tonic::Code::DeadlineExceeded => TransportError::Timeout(self.timeout),
            _ => status.into(),
        }
    }
}

#[async_trait]
impl SearchBackend for RemoteBackend {
    fn name(&self) -> &str {
        rpc::DEFAULT_REMOTE_LABEL
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        let mut client = self.client.clone();
        let mut message = proto::SearchRequest::from(request);
        message.max_matches = self.max_matches.map_or(0, |n| n as u64);
        let mut rpc_request = tonic::Request::new(message);
        rpc_request.set_timeout(self.timeout);

        tracing::info!(
            "Invoking remote search at {} with allow_overlapping={}",
            self.address,
            request.allow_overlapping
        );

        let response = match tokio::time::timeout(self.timeout, client.search(rpc_request)).await {
            Ok(Ok(response)) => response.into_inner(),
            Ok(Err(status)) => return Err(self.classify(status).into()),
            Err(_) => return Err(TransportError::Timeout(self.timeout).into()),
        };

        let outcome = rpc::outcome_from_response(response, request, self.max_matches)?;
        tracing::debug!(
            "Remote search returned {} matches in {:.3}ms ({})",
            outcome.total_matches,
            outcome.search_time_ms,
            outcome.algorithm_used
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::Pattern;

    /// Port with nothing listening on it / 无服务监听的端口
    async fn closed_port() -> u16 {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_invalid_endpoint_is_not_transport() {
        let config = RemoteConfig {
            host: "bad host name".to_string(),
            ..RemoteConfig::default()
        };
        let err = RemoteBackend::new(&config).unwrap_err();
        assert!(matches!(err, SearchError::Backend(_)));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn test_zero_timeout_is_rejected() {
        let config = RemoteConfig {
            timeout_secs: 0.0,
            ..RemoteConfig::default()
        };
        assert!(matches!(RemoteBackend::new(&config), Err(SearchError::Backend(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_transport_error() {
        let config = RemoteConfig {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: closed_port().await,
            timeout_secs: 2.0,
            connect_timeout_secs: 1.0,
            ..RemoteConfig::default()
        };
        let backend = RemoteBackend::new(&config).unwrap();
        assert_eq!(backend.address(), format!("127.0.0.1:{}", config.port));

        let request = SearchRequest::new("ATCGATCG", Pattern::parse("TCG").unwrap(), true);
        let err = backend.search(&request).await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {:?}", err);
    }
}
