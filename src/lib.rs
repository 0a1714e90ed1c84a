//! Multi-client TCP Chat Relay Library
//!
//! A chat relay over raw TCP using length-prefixed UTF-8 text frames.
//! Each client's first frame is its display name; every later frame is
//! either chat text, fanned out to all other connected clients as
//! `"name: text"`, or the quit keyword `"salir"` ending the session.
//!
//! # Architecture
//! One task per connection plus one shared registry:
//! - [`server::serve`] accepts sockets, registers the write half, and
//!   spawns a worker per connection
//! - [`worker::run_connection`] owns the read half and drives the
//!   name/chat/quit protocol
//! - [`Registry`] holds every live write half behind one mutex; all
//!   membership changes and broadcast fan-outs serialize through it
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//! use chat_relay::{server, Registry};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:12345").await?;
//!     let registry = Arc::new(Registry::new());
//!     server::serve(listener, registry).await
//! }
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod registry;
pub mod server;
pub mod types;
pub mod worker;

// Re-export main types for convenience
pub use client::Client;
pub use error::RelayError;
pub use registry::Registry;
pub use types::ClientId;
pub use worker::QUIT_KEYWORD;
