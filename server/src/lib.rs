//! # Player Info Server Library
//!
//! The connection layer around the `protocol` crate. It owns the listening
//! socket, accepts clients, reads their messages and writes back the responses
//! the protocol engine produces.
//!
//! ## Connection Model
//!
//! The server talks to one client at a time. After a client connects the
//! server loops reading a message, answering it, and reading the next one
//! until the client closes the connection; only then is the next client
//! accepted. Each socket read of up to `buffer_size` bytes is one message.
//!
//! Malformed or unsupported requests are ordinary protocol outcomes: they get
//! a `Fail` response and the connection stays open. Only transport errors end
//! a connection, and they never stop the accept loop.
//!
//! ## Module Organization
//!
//! ### Config Module (`config`)
//! Listen address, buffer size, shutdown behaviour and the player record.
//!
//! ### Network Module (`network`)
//! TCP accept loop and the per-connection message loop.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::config::ServerConfig;
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind(ServerConfig::new("127.0.0.1", 5000)).await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod network;
