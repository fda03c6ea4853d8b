//! Remote search backend server / 远程搜索后端服务
//!
//! Serves `dna.DnaSearch/Search` over gRPC with the KMP matcher. This is the
//! backend the orchestrator talks to when remote search is enabled.

pub mod service;

use anyhow::{Context, Result};
use std::future::Future;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::config::ServerConfig;
use crate::rpc::DnaSearchServer;

pub use service::{DnaSearchService, SERVER_ALGORITHM_LABEL};

/// Build the gRPC service with the configured message ceilings / 创建 gRPC 服务
pub fn grpc_service(config: &ServerConfig, max_matches: Option<usize>) -> DnaSearchServer<DnaSearchService> {
    DnaSearchServer::new(DnaSearchService::new(max_matches))
        .max_decoding_message_size(config.max_message_bytes)
        .max_encoding_message_size(config.max_message_bytes)
}

/// Bind `host:port` and serve until `shutdown` resolves / 监听并服务直到关闭
pub async fn serve<F>(config: &ServerConfig, max_matches: Option<usize>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let address = config.get_bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    serve_with_listener(listener, config, max_matches, shutdown).await
}

/// Serve on an already bound listener / 在已绑定的监听器上服务
pub async fn serve_with_listener<F>(
    listener: TcpListener,
    config: &ServerConfig,
    max_matches: Option<usize>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send,
{
    let local_addr = listener.local_addr().context("Failed to read listener address")?;
    tracing::info!("DNA search backend listening on {}", local_addr);

    Server::builder()
        .add_service(grpc_service(config, max_matches))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
        .context("gRPC server error")?;

    tracing::info!("DNA search backend on {} stopped", local_addr);
    Ok(())
}
