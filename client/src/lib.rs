//! # Player Info Client Library
//!
//! A small TCP client for the player info server, used by the `client`
//! binary and by the workspace integration tests.
//!
//! ```rust,no_run
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("127.0.0.1:5000").await?;
//!     let response = client.get_player_info("123456789", "1234").await?;
//!     println!("{:?}", response.status);
//!     Ok(())
//! }
//! ```

pub mod network;
