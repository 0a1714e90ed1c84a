//! Client struct definition
//!
//! The registry-side handle for one live connection: its id and the
//! write half of its socket. The read half stays with the connection
//! worker, which owns the connection's lifecycle.

use tokio::io::AsyncWrite;

use crate::codec;
use crate::error::RelayError;
use crate::types::ClientId;

/// Write side of a connected client
///
/// Held inside the registry for the connection's lifetime. The writer is
/// boxed so tests can register in-memory streams in place of sockets.
pub struct Client {
    /// Unique identifier for this connection
    pub id: ClientId,
    /// Outbound byte stream (write half of the socket)
    writer: Box<dyn AsyncWrite + Send + Unpin>,
}

impl Client {
    /// Create a new client handle from an id and a write stream
    pub fn new(id: ClientId, writer: impl AsyncWrite + Send + Unpin + 'static) -> Self {
        Self {
            id,
            writer: Box::new(writer),
        }
    }

    /// Send one text frame to this client
    ///
    /// Returns an error if the peer's receive side is gone. The caller
    /// decides what a failed send means; this method never tears the
    /// connection down itself.
    pub async fn send(&mut self, text: &str) -> Result<(), RelayError> {
        codec::write_frame(&mut self.writer, text).await
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client").field("id", &self.id).finish()
    }
}
