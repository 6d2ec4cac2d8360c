use tactix::app::{server::start_server, types, utils};

// Single threaded runtime
#[tokio::main(flavor = "current_thread")]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config =
        utils::read_config::<types::ServerConfig>("config/server.toml", Some("TACTIX_SERVER"));

    let server_config = config.server.clone().unwrap_or_default();
    let server_address = format!("{}:{}", server_config.host, server_config.port);

    let tcp_listener = tokio::net::TcpListener::bind(&server_address).await?;

    start_server(config, tcp_listener).await;

    Ok(())
}
