// HTTP surface consumed by the chat UI
pub mod routes;
pub mod server;

pub use routes::{create_router, AppState};
pub use server::WebServer;
