use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::chat::Dispatcher;
use crate::web::routes::{self, AppState};

/// Web server instance
pub struct WebServer {
    bind_addr: SocketAddr,
    dispatcher: Arc<Dispatcher>,
}

impl WebServer {
    /// Create a new web server around a shared dispatcher
    pub fn new(bind_addr: SocketAddr, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            bind_addr,
            dispatcher,
        }
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        let app_state = AppState {
            dispatcher: self.dispatcher,
        };

        // The browser UI runs on its own origin during development.
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = routes::create_router(app_state).layer(cors);

        tracing::info!("[Web] Listening on http://{}", self.bind_addr);

        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
