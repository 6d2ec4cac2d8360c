use crate::app::server::grpc::server::{PingRequest, PingResponse};

pub async fn ping(
    request: tonic::Request<PingRequest>,
) -> Result<tonic::Response<PingResponse>, tonic::Status> {
    tracing::info!(?request);

    Ok(tonic::Response::new(PingResponse {
        message: "pong".to_string(),
    }))
}
