use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::transport::Server;

use crate::grpc::agent_service::AgentService;
use crate::proto::agent_server::AgentServer;
use crate::service::EvaluationService;

pub struct GrpcServer {
    addr: SocketAddr,
    service: Arc<EvaluationService>,
}

impl GrpcServer {
    pub fn new(addr: SocketAddr, service: Arc<EvaluationService>) -> Self {
        Self { addr, service }
    }

    /// Serve on the configured address until `shutdown` is cancelled.
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), tonic::transport::Error> {
        tracing::info!(addr = %self.addr, "Starting gRPC server");

        Server::builder()
            .add_service(AgentServer::new(AgentService::new(self.service)))
            .serve_with_shutdown(self.addr, async move { shutdown.cancelled().await })
            .await
    }

    /// Serve on an already bound listener (port 0 in tests) until `shutdown` is cancelled.
    pub async fn run_with_listener(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<(), tonic::transport::Error> {
        let local_addr = listener.local_addr().unwrap_or(self.addr);
        tracing::info!(addr = %local_addr, "Starting gRPC server");

        Server::builder()
            .add_service(AgentServer::new(AgentService::new(self.service)))
            .serve_with_incoming_shutdown(TcpListenerStream::new(listener), async move {
                shutdown.cancelled().await
            })
            .await
    }
}
