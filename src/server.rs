//! Listener: accept loop for the chat relay
//!
//! Accepts connections forever. Each accepted socket is split: the write
//! half goes into the registry immediately, the read half goes to a
//! spawned connection worker. An accept error is fatal for the whole
//! server, dropping every connected client; that single broad fault
//! boundary is inherited behavior and kept as-is.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::client::Client;
use crate::registry::Registry;
use crate::types::ClientId;
use crate::worker;

/// Accept connections on `listener` until an accept error occurs.
///
/// Returns only on failure; a clean return does not exist.
pub async fn serve(listener: TcpListener, registry: Arc<Registry>) -> std::io::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        let id = ClientId::new();
        info!("new client connected from {} ({})", addr, id);

        let (reader, writer) = stream.into_split();
        registry.register(Client::new(id, writer)).await;

        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            if let Err(e) = worker::run_connection(reader, id, &registry).await {
                error!("connection {} ended with error: {}", id, e);
            }
        });
    }
}
