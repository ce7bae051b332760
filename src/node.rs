use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::AgentConfig;
use crate::error::Result;
use crate::grpc::GrpcServer;
use crate::service::EvaluationService;

/// Process-level orchestrator: one evaluation service behind one gRPC server.
pub struct Node {
    pub config: AgentConfig,
    pub service: Arc<EvaluationService>,
}

impl Node {
    /// Build the shared queue, result table and worker pool. Must be called inside a tokio runtime.
    pub fn new(config: AgentConfig) -> Self {
        let service = Arc::new(EvaluationService::new(config.clone()));
        Self { config, service }
    }

    /// Run until `shutdown` is cancelled.
    ///
    /// 1. Serves `SendExpression` on the configured address
    /// 2. On shutdown stops accepting RPCs, lets in-flight ones finish
    /// 3. Closes the job queue and joins the workers
    ///
    /// # Errors
    ///
    /// Returns an error if the gRPC server fails to bind or serve.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let server = GrpcServer::new(self.config.listen_addr, self.service.clone());
        let served = server.run(shutdown).await;
        self.service.shutdown().await;
        served?;
        Ok(())
    }

    /// Same as [`run`](Self::run) on an already bound listener.
    pub async fn run_with_listener(
        self,
        listener: TcpListener,
        shutdown: CancellationToken,
    ) -> Result<()> {
        let server = GrpcServer::new(self.config.listen_addr, self.service.clone());
        let served = server.run_with_listener(listener, shutdown).await;
        self.service.shutdown().await;
        served?;
        Ok(())
    }
}
