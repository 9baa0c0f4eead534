//! Pokerplan server binary.

use pokerplan::{PokerServer, ServerError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let addr = std::env::var("POKERPLAN_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3001".to_string());

    let server = PokerServer::builder().bind(&addr).build().await?;
    tracing::info!(%addr, "starting Pokerplan");
    server.run().await
}
