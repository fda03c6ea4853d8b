//! Search error types / 搜索错误类型
//!
//! The orchestrator only falls back to local search for [`SearchError::Transport`].
//! Every other variant is returned to the caller unchanged.

use std::time::Duration;
use thiserror::Error;

/// Input rejected before any search runs / 输入校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("pattern is empty")]
    EmptyPattern,

    #[error("sequence is empty")]
    EmptySequence,

    #[error("invalid character {ch:?} at position {position}: only A, T, C, G or N are allowed")]
    InvalidCharacter { ch: char, position: usize },

    #[error("pattern is too long ({len} characters, maximum {max})")]
    PatternTooLong { len: usize, max: usize },
}

/// Failure reaching or talking to the remote backend / 远程后端通信错误
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Channel could not be established / 无法建立连接
    #[error("remote backend unreachable at {address}: {message}")]
    Unreachable { address: String, message: String },

    /// Call exceeded the configured deadline / 调用超时
    #[error("remote call timed out after {0:?}")]
    Timeout(Duration),

    /// Any gRPC status returned by the remote side / 远程返回的 gRPC 状态
    #[error("remote backend returned {code:?}: {message}")]
    Status { code: tonic::Code, message: String },

    /// Response decoded but violates the result contract / 响应不符合结果约定
    #[error("malformed response from remote backend: {0}")]
    MalformedResponse(String),
}

impl From<tonic::Status> for TransportError {
    fn from(status: tonic::Status) -> Self {
        TransportError::Status {
            code: status.code(),
            message: status.message().to_string(),
        }
    }
}

/// Error returned by a search / 搜索错误
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Remote failure outside the transport family, never retried locally
    #[error("remote backend failed: {0}")]
    Backend(String),

    #[error("search was cancelled")]
    Cancelled,

    #[error("local search failed: {0}")]
    Internal(String),
}

impl SearchError {
    /// Whether this error makes the orchestrator fall back to local search
    pub fn is_transport(&self) -> bool {
        matches!(self, SearchError::Transport(_))
    }
}

/// Convenience alias / 结果别名
pub type Result<T> = std::result::Result<T, SearchError>;
