use std::sync::Arc;
use tonic::{Request, Response, Status};
use uuid::Uuid;

use crate::proto::agent_server::Agent;
use crate::proto::{ExpressionRequest, ExpressionResult};
use crate::service::EvaluationService;

/// gRPC front of the [`EvaluationService`]
pub struct AgentService {
    service: Arc<EvaluationService>,
}

impl AgentService {
    pub fn new(service: Arc<EvaluationService>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl Agent for AgentService {
    async fn send_expression(
        &self,
        request: Request<ExpressionRequest>,
    ) -> Result<Response<ExpressionResult>, Status> {
        let req = request.into_inner();

        // Blank ids get a generated one so replies can still be correlated
        let request_id = if req.id.trim().is_empty() {
            Uuid::new_v4().to_string()
        } else {
            req.id
        };
        tracing::debug!(request_id = %request_id, expression = %req.expression, "Received SendExpression");

        let outcome = self
            .service
            .evaluate(&request_id, &req.expression)
            .await
            .map_err(|e| {
                tracing::warn!(request_id = %request_id, error = %e, "SendExpression failed");
                Status::from(e)
            })?;

        Ok(Response::new(ExpressionResult {
            id: outcome.request_id,
            result: outcome.result,
        }))
    }
}
