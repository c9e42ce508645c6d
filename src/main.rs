use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;

use llm_relay::chat::Dispatcher;
use llm_relay::config::RelayConfig;
use llm_relay::logging;
use llm_relay::web::WebServer;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let config = RelayConfig::from_env();
    let bind_addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let dispatcher = Arc::new(Dispatcher::new(&config));

    WebServer::new(bind_addr, dispatcher).start().await
}
