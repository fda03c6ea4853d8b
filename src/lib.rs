//! DNA exact pattern search / DNA 精确模式搜索
//!
//! Callers go through [`SearchOrchestrator`], which validates input and runs
//! the search in-process or on the gRPC backend served by [`server`].

pub mod backend;
pub mod config;
pub mod error;
pub mod matcher;
pub mod models;
pub mod rpc;
pub mod search;
pub mod server;
pub mod validators;

pub use error::{SearchError, TransportError, ValidationError};
pub use matcher::{Algorithm, Matcher};
pub use models::{Match, SearchOutcome};
pub use search::SearchOrchestrator;
