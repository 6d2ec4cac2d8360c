pub mod errors;
pub mod game;
pub mod grpc;

use std::sync::Arc;

use app::server::grpc::{
    server::{grpc_server, MyGrpc, FILE_DESCRIPTOR_SET},
    storage::Store,
    utils::create_redis_client,
};

use crate::app::{self, types};

pub async fn start_server(config: types::ServerConfig, tcp_listener: tokio::net::TcpListener) {
    let formatter = tracing_subscriber::fmt::format()
        .with_file(true)
        .with_line_number(true);

    tracing_subscriber::fmt().event_format(formatter).init();

    let redis_client = create_redis_client(config.redis.unwrap_or_default())
        .await
        .unwrap();

    let store = Store::new(Arc::new(redis_client));
    let service = MyGrpc::new(store);

    tracing::info!("Server successfully running on {:?}", tcp_listener.local_addr());

    let reflection_service = tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(FILE_DESCRIPTOR_SET)
        .build()
        .unwrap();

    tonic::transport::Server::builder()
        .add_service(reflection_service)
        .add_service(grpc_server::GrpcServer::new(service))
        .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(tcp_listener))
        .await
        .expect("Could not start the server");
}
