//! Client registry: the shared set of active connections
//!
//! One mutex guards every membership change and every broadcast fan-out,
//! so registrations, removals, and deliveries form a single global serial
//! sequence. The guard is held across the whole fan-out, which means a
//! slow recipient stalls every other registry operation until its send
//! completes or fails. That coarseness is inherited behavior and kept.

use std::collections::HashMap;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::client::Client;
use crate::types::ClientId;

/// Set of currently active connections, keyed by id
///
/// Created empty at server start and shared (`Arc`) into the listener and
/// every worker. Never torn down; it lives for the process lifetime.
/// There is no capacity bound and no name uniqueness check.
pub struct Registry {
    clients: Mutex<HashMap<ClientId, Client>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Insert a connection into the active set
    pub async fn register(&self, client: Client) {
        let mut clients = self.clients.lock().await;
        debug!("registering client {}", client.id);
        clients.insert(client.id, client);
    }

    /// Remove a connection from the active set
    ///
    /// Idempotent: removing an id that is already gone is a no-op.
    /// Dropping the entry closes the write half of the socket.
    pub async fn unregister(&self, id: ClientId) {
        let mut clients = self.clients.lock().await;
        if clients.remove(&id).is_some() {
            debug!("unregistered client {}", id);
        }
    }

    /// Deliver `text` to every registered connection except `exclude`
    ///
    /// A send failure to one recipient is logged and skipped: the fan-out
    /// continues to the remaining recipients, and the failed recipient
    /// stays registered. A connection is only ever evicted through its own
    /// worker's read loop, so a half-broken outbound side may linger until
    /// its inbound side also fails.
    pub async fn broadcast(&self, text: &str, exclude: ClientId) {
        let mut clients = self.clients.lock().await;
        for (id, client) in clients.iter_mut() {
            if *id == exclude {
                continue;
            }
            if let Err(e) = client.send(text).await {
                warn!("failed to send to client {}: {}", id, e);
            }
        }
    }

    /// Number of currently registered connections
    pub async fn client_count(&self) -> usize {
        self.clients.lock().await.len()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
