//! gRPC contract with the remote search backend / 远程搜索后端的 gRPC 约定
//!
//! Message types and client/server stubs are generated from
//! `proto/dna_search.proto` by `build.rs`.

use crate::backend::SearchRequest;
use crate::error::TransportError;
use crate::matcher::build_match;
use crate::models::{Match, SearchOutcome};

#[allow(clippy::all)]
pub mod proto {
    tonic::include_proto!("dna");
}

pub use proto::dna_search_client::DnaSearchClient;
pub use proto::dna_search_server::{DnaSearch, DnaSearchServer};

/// Message size ceiling for sequences and result sets (200 MiB) / 消息大小上限
pub const MAX_MESSAGE_BYTES: usize = 200 * 1024 * 1024;

/// Label used when the remote side does not name its algorithm / 默认远程算法标签
pub const DEFAULT_REMOTE_LABEL: &str = "grpc";

impl From<&SearchRequest> for proto::SearchRequest {
    fn from(request: &SearchRequest) -> Self {
        proto::SearchRequest {
            sequence: request.sequence.to_string(),
            pattern: request.pattern.to_string(),
            allow_overlapping: request.allow_overlapping,
            max_matches: 0,
        }
    }
}

impl From<&Match> for proto::Match {
    fn from(m: &Match) -> Self {
        proto::Match {
            position: m.position as i64,
            context_before: m.context_before.clone(),
            context_after: m.context_after.clone(),
        }
    }
}

/// Convert a remote response into an outcome, checking it against the request / 转换并校验远程响应
///
/// Any violation of the result contract is a [`TransportError::MalformedResponse`].
/// At most `max_matches` matches are kept; a longer list is cut and marked
/// truncated, the same way a local scan reports its cap.
pub fn outcome_from_response(
    response: proto::SearchResponse,
    request: &SearchRequest,
    max_matches: Option<usize>,
) -> Result<SearchOutcome, TransportError> {
    let sequence = request.sequence.as_bytes();
    let pattern = request.pattern.as_bytes();

    if !response.search_time_ms.is_finite() || response.search_time_ms < 0.0 {
        return Err(malformed(format!("invalid search time {}", response.search_time_ms)));
    }

    // proto3 leaves an unset count at zero / proto3 未设置时为 0
    let returned = response.matches.len();
    let reported_total = if response.total_matches == 0 {
        returned
    } else {
        usize::try_from(response.total_matches)
            .map_err(|_| malformed(format!("negative total {}", response.total_matches)))?
    };
    if reported_total != returned {
        return Err(malformed(format!(
            "total {} disagrees with {} returned matches",
            reported_total, returned
        )));
    }

    let limit = max_matches.unwrap_or(usize::MAX);
    let mut truncated = response.truncated;
    let mut matches = Vec::with_capacity(returned.min(limit));
    let mut previous: Option<usize> = None;
    for m in response.matches {
        if matches.len() >= limit {
            truncated = true;
            break;
        }
        let position = usize::try_from(m.position)
            .map_err(|_| malformed(format!("negative position {}", m.position)))?;
        if previous.is_some_and(|p| position <= p) {
            return Err(malformed(format!("position {} is not ascending", position)));
        }
        let end = position
            .checked_add(pattern.len())
            .filter(|&end| end <= sequence.len())
            .ok_or_else(|| malformed(format!("position {} is past the end of the sequence", position)))?;
        if &sequence[position..end] != pattern {
            return Err(malformed(format!("no occurrence of the pattern at position {}", position)));
        }
        let expected = build_match(sequence, position, pattern.len());
        if m.context_before != expected.context_before || m.context_after != expected.context_after {
            return Err(malformed(format!("wrong context around position {}", position)));
        }
        previous = Some(position);
        matches.push(expected);
    }

    let algorithm_used = if response.algorithm_used.is_empty() {
        DEFAULT_REMOTE_LABEL.to_string()
    } else {
        response.algorithm_used
    };

    Ok(SearchOutcome {
        pattern: request.pattern.to_string(),
        algorithm_used,
        search_time_ms: response.search_time_ms,
        total_matches: matches.len(),
        matches,
        truncated,
    })
}

fn malformed(message: String) -> TransportError {
    TransportError::MalformedResponse(message)
}
