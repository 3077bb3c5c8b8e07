//! Server configuration

use protocol::PlayerRecord;
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
/// Largest message read from the socket in one go
pub const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Everything the connection layer needs to serve clients
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `host:port` to listen on
    pub address: String,
    /// Size of the per-connection receive buffer; one read is one message
    pub buffer_size: usize,
    /// Stop after the first client disconnects
    pub single_connection: bool,
    /// Append a NUL byte to every response for C-string clients
    pub nul_terminate: bool,
    /// Record the `GetPlayerInfo` handler authenticates against
    pub player: Arc<PlayerRecord>,
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            address: format!("{}:{}", host, port),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: format!("{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            buffer_size: DEFAULT_BUFFER_SIZE,
            single_connection: false,
            nul_terminate: false,
            player: Arc::new(PlayerRecord::default()),
        }
    }
}

/// Reads a player record from a JSON file
pub fn load_player(path: &Path) -> Result<PlayerRecord, Box<dyn Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(PlayerRecord::from_json(&json)?)
}
