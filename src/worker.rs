//! Connection worker: the per-client protocol state machine
//!
//! Each accepted socket gets one worker task. The worker owns the read
//! half of the socket; the write half was handed to the registry at
//! accept time. Lifecycle: read the display name, announce the join,
//! then relay every frame until the quit keyword or a read failure.

use tokio::io::AsyncRead;
use tracing::info;

use crate::codec::read_frame;
use crate::error::RelayError;
use crate::registry::Registry;
use crate::types::ClientId;

/// Keyword that ends a session through the explicit-disconnect path.
/// Compared case-insensitively, like the rest of the protocol's Spanish.
pub const QUIT_KEYWORD: &str = "salir";

/// Drive one connection from name exchange to close.
///
/// The connection is already registered when this runs. The first frame
/// becomes the immutable display name; no validation is applied (empty or
/// duplicate names are accepted as-is). Sending the quit keyword ends the
/// session with a leave notice to everyone else; a read failure of any
/// kind ends it silently. Either way the worker unregisters itself, which
/// drops the write half and closes the socket.
pub async fn run_connection<R>(
    mut reader: R,
    id: ClientId,
    registry: &Registry,
) -> Result<(), RelayError>
where
    R: AsyncRead + Unpin,
{
    // First frame is the display name. Failing before it arrives is the
    // same implicit-disconnect path as any later read failure: no notice.
    let name = match read_frame(&mut reader).await {
        Ok(name) => name,
        Err(e) => {
            registry.unregister(id).await;
            return Err(e);
        }
    };

    info!("{} se ha unido al chat.", name);
    registry
        .broadcast(&format!("{} se ha unido al chat.", name), id)
        .await;

    loop {
        let message = match read_frame(&mut reader).await {
            Ok(message) => message,
            Err(e) => {
                // Peer reset, EOF, or a corrupt frame: drop out without a
                // leave notice. Only the quit keyword announces departure.
                registry.unregister(id).await;
                return Err(e);
            }
        };

        if message.eq_ignore_ascii_case(QUIT_KEYWORD) {
            info!("{} ha salido del chat.", name);
            registry
                .broadcast(&format!("{} ha salido del chat.", name), id)
                .await;
            registry.unregister(id).await;
            return Ok(());
        }

        info!("{}: {}", name, message);
        registry
            .broadcast(&format!("{}: {}", name, message), id)
            .await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::io::DuplexStream;
    use tokio::task::JoinHandle;
    use tokio::time::timeout;

    use super::*;
    use crate::client::Client;
    use crate::codec::write_frame;

    /// Wire a worker into a registry: returns the test's write end of the
    /// worker's inbound stream, its read end of the outbound stream, the
    /// worker's id, and the running worker task.
    async fn spawn_worker(
        registry: &Arc<Registry>,
    ) -> (
        DuplexStream,
        DuplexStream,
        ClientId,
        JoinHandle<Result<(), RelayError>>,
    ) {
        let (inbound_tx, inbound_rx) = tokio::io::duplex(1024);
        let (outbound_tx, outbound_rx) = tokio::io::duplex(1024);
        let id = ClientId::new();
        registry.register(Client::new(id, outbound_tx)).await;

        let registry = Arc::clone(registry);
        let task =
            tokio::spawn(async move { run_connection(inbound_rx, id, &registry).await });
        (inbound_tx, outbound_rx, id, task)
    }

    async fn recv(stream: &mut DuplexStream) -> String {
        timeout(Duration::from_secs(1), read_frame(stream))
            .await
            .expect("timed out waiting for frame")
            .expect("read failed")
    }

    async fn assert_silent(stream: &mut DuplexStream) {
        let res = timeout(Duration::from_millis(100), read_frame(stream)).await;
        assert!(res.is_err(), "expected no frame, got {:?}", res);
    }

    #[tokio::test]
    async fn test_join_then_chat_reaches_others_not_sender() {
        let registry = Arc::new(Registry::new());
        let (mut ana_in, mut ana_out, _, _ana_task) = spawn_worker(&registry).await;
        let (mut luis_in, mut luis_out, _, _luis_task) = spawn_worker(&registry).await;

        write_frame(&mut ana_in, "Ana").await.unwrap();
        write_frame(&mut luis_in, "Luis").await.unwrap();
        assert_eq!(recv(&mut luis_out).await, "Ana se ha unido al chat.");
        assert_eq!(recv(&mut ana_out).await, "Luis se ha unido al chat.");

        write_frame(&mut ana_in, "hola").await.unwrap();
        assert_eq!(recv(&mut luis_out).await, "Ana: hola");
        assert_silent(&mut ana_out).await;
    }

    #[tokio::test]
    async fn test_quit_keyword_is_case_insensitive() {
        let registry = Arc::new(Registry::new());
        let (mut ana_in, mut ana_out, _, _ana_task) = spawn_worker(&registry).await;
        let (mut luis_in, _luis_out, _, luis_task) = spawn_worker(&registry).await;

        write_frame(&mut ana_in, "Ana").await.unwrap();
        write_frame(&mut luis_in, "Luis").await.unwrap();
        assert_eq!(recv(&mut ana_out).await, "Luis se ha unido al chat.");

        write_frame(&mut luis_in, "SALIR").await.unwrap();
        assert_eq!(recv(&mut ana_out).await, "Luis ha salido del chat.");

        assert!(luis_task.await.unwrap().is_ok());
        assert_eq!(registry.client_count().await, 1);
    }

    #[tokio::test]
    async fn test_read_failure_skips_leave_notice() {
        let registry = Arc::new(Registry::new());
        let (mut ana_in, mut ana_out, _, _ana_task) = spawn_worker(&registry).await;
        let (mut luis_in, _luis_out, _, luis_task) = spawn_worker(&registry).await;

        write_frame(&mut ana_in, "Ana").await.unwrap();
        write_frame(&mut luis_in, "Luis").await.unwrap();
        assert_eq!(recv(&mut ana_out).await, "Luis se ha unido al chat.");

        // Abrupt disconnect: the worker sees EOF, not the quit keyword
        drop(luis_in);

        assert!(luis_task.await.unwrap().is_err());
        assert_eq!(registry.client_count().await, 1);
        assert_silent(&mut ana_out).await;
    }

    #[tokio::test]
    async fn test_failure_before_name_is_silent() {
        let registry = Arc::new(Registry::new());
        let (mut ana_in, mut ana_out, _, _ana_task) = spawn_worker(&registry).await;
        let (ghost_in, _ghost_out, _, ghost_task) = spawn_worker(&registry).await;

        write_frame(&mut ana_in, "Ana").await.unwrap();

        // Ghost never sends a name; no join or leave notice for it
        drop(ghost_in);

        assert!(ghost_task.await.unwrap().is_err());
        assert_eq!(registry.client_count().await, 1);
        assert_silent(&mut ana_out).await;
    }

    #[tokio::test]
    async fn test_duplicate_names_both_relay() {
        let registry = Arc::new(Registry::new());
        let (mut first_in, mut first_out, _, _t1) = spawn_worker(&registry).await;
        let (mut second_in, mut second_out, _, _t2) = spawn_worker(&registry).await;

        write_frame(&mut first_in, "Ana").await.unwrap();
        write_frame(&mut second_in, "Ana").await.unwrap();
        assert_eq!(recv(&mut second_out).await, "Ana se ha unido al chat.");
        assert_eq!(recv(&mut first_out).await, "Ana se ha unido al chat.");

        write_frame(&mut first_in, "soy la primera").await.unwrap();
        assert_eq!(recv(&mut second_out).await, "Ana: soy la primera");

        write_frame(&mut second_in, "y yo la segunda").await.unwrap();
        assert_eq!(recv(&mut first_out).await, "Ana: y yo la segunda");

        assert_eq!(registry.client_count().await, 2);
    }
}

