//! Multi-client TCP chat relay - Entry Point
//!
//! Binds the listen port, creates the shared registry, and runs the
//! accept loop until the process is killed or the loop fails.

use std::env;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chat_relay::{server, Registry};

/// Default server address
const DEFAULT_ADDR: &str = "127.0.0.1:12345";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging with environment filter
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    // Get bind address from command line or use default
    let addr = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    // A bind failure means the server never starts
    let listener = TcpListener::bind(&addr).await?;
    info!("chat relay listening on {}", addr);

    let registry = Arc::new(Registry::new());

    // Runs until the accept loop fails; that failure takes the whole
    // server down with it
    server::serve(listener, registry).await?;
    Ok(())
}
