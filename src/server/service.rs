//! `dna.DnaSearch` service implementation / gRPC 搜索服务实现

use std::time::Instant;
use tonic::{Request, Response, Status};

use crate::matcher::{Algorithm, Matcher, DEFAULT_MAX_MATCHES};
use crate::rpc::{proto, DnaSearch};
use crate::validators::MAX_PATTERN_LEN;

/// Label the backend reports in `algorithm_used` / 后端返回的算法标签
pub const SERVER_ALGORITHM_LABEL: &str = "KMP";

/// KMP-backed search service / 基于 KMP 的搜索服务
#[derive(Debug, Clone, Copy)]
pub struct DnaSearchService {
    matcher: Matcher,
}

impl Default for DnaSearchService {
    fn default() -> Self {
        Self::new(Some(DEFAULT_MAX_MATCHES))
    }
}

impl DnaSearchService {
    pub fn new(max_matches: Option<usize>) -> Self {
        Self {
            matcher: Matcher::new(Algorithm::Kmp).with_max_matches(max_matches),
        }
    }

    /// Answer one request on the current thread / 同步处理单个请求
    pub fn search_response(&self, request: proto::SearchRequest) -> Result<proto::SearchResponse, Status> {
        if request.sequence.is_empty() || request.pattern.is_empty() {
            return Err(Status::invalid_argument("Sequence and pattern cannot be empty"));
        }
        if request.pattern.len() > MAX_PATTERN_LEN {
            return Err(Status::invalid_argument(format!(
                "Pattern is too long ({} characters, maximum {})",
                request.pattern.len(),
                MAX_PATTERN_LEN
            )));
        }

        let matcher = self.matcher_for(request.max_matches);
        let started = Instant::now();
        let list = matcher.find(&request.sequence, &request.pattern, request.allow_overlapping);
        let search_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        let total_matches = i32::try_from(list.matches.len())
            .map_err(|_| Status::out_of_range("Too many matches for the response"))?;

        tracing::debug!(
            "Search: sequence_len={}, pattern_len={}, overlapping={}, matches={}, truncated={}, {:.3}ms",
            request.sequence.len(),
            request.pattern.len(),
            request.allow_overlapping,
            total_matches,
            list.truncated,
            search_time_ms
        );

        Ok(proto::SearchResponse {
            matches: list.matches.iter().map(proto::Match::from).collect(),
            total_matches,
            search_time_ms,
            algorithm_used: SERVER_ALGORITHM_LABEL.to_string(),
            truncated: list.truncated,
        })
    }

    /// Server cap, lowered to the caller's cap when one is sent / 取服务端与请求上限的较小值
    fn matcher_for(&self, requested: u64) -> Matcher {
        if requested == 0 {
            return self.matcher;
        }
        let requested = usize::try_from(requested).unwrap_or(usize::MAX);
        let cap = match self.matcher.max_matches() {
            Some(own) => own.min(requested),
            None => requested,
        };
        self.matcher.with_max_matches(Some(cap))
    }
}

#[tonic::async_trait]
impl DnaSearch for DnaSearchService {
    async fn search(
        &self,
        request: Request<proto::SearchRequest>,
    ) -> Result<Response<proto::SearchResponse>, Status> {
        let service = *self;
        let request = request.into_inner();
        let response = tokio::task::spawn_blocking(move || service.search_response(request))
            .await
            .map_err(|e| Status::internal(format!("search task failed: {}", e)))??;
        Ok(Response::new(response))
    }
}
