use tonic::{Request, Response, Status};

use crate::proto::{self, health_service_server::HealthService};

pub const SERVING: &str = "SERVING";

/// Liveness probe. Reached without credentials through the gate's bypass
/// suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct HealthHandler;

#[tonic::async_trait]
impl HealthService for HealthHandler {
    async fn health(
        &self,
        _request: Request<proto::HealthRequest>,
    ) -> Result<Response<proto::HealthResponse>, Status> {
        Ok(Response::new(proto::HealthResponse {
            status: SERVING.to_string(),
        }))
    }
}
