//! Server network layer handling TCP connections and message exchange

use crate::config::ServerConfig;
use log::{debug, error, info, warn};
use protocol::Session;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

/// Traffic totals for one finished connection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStats {
    pub messages: u64,
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

/// Listening server that serves one client connection at a time
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    pub async fn bind(config: ServerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let listener = TcpListener::bind(config.address.as_str()).await?;
        info!("Server listening on {}", listener.local_addr()?);

        Ok(Server { listener, config })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts clients one after another.
    ///
    /// The next connection is only accepted once the current one has closed.
    pub async fn run(&self) -> std::io::Result<()> {
        info!("Server started successfully");

        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    continue;
                }
            };

            info!("Client connected from {}", peer);
            if let Err(e) = stream.set_nodelay(true) {
                warn!("Failed to disable Nagle for {}: {}", peer, e);
            }

            match serve_connection(stream, &self.config).await {
                Ok(stats) => info!(
                    "Client {} disconnected after {} messages ({} bytes in, {} bytes out)",
                    peer, stats.messages, stats.bytes_received, stats.bytes_sent
                ),
                Err(e) => error!("Connection with {} failed: {}", peer, e),
            }

            if self.config.single_connection {
                info!("Single connection served, shutting down");
                break;
            }
        }

        Ok(())
    }
}

/// Runs the request/response loop for one client until it disconnects.
///
/// Each read is treated as one complete message and answered with one write.
/// A read of zero bytes ends the connection.
pub async fn serve_connection<S>(
    mut stream: S,
    config: &ServerConfig,
) -> std::io::Result<ConnectionStats>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = Session::new(Arc::clone(&config.player));
    let mut buffer = vec![0u8; config.buffer_size.max(1)];
    let mut stats = ConnectionStats::default();

    loop {
        let len = stream.read(&mut buffer).await?;
        if len == 0 {
            break;
        }

        debug!("Received {} bytes", len);
        stats.messages += 1;
        stats.bytes_received += len as u64;

        let mut outbound = session.handle(&buffer[..len]);
        if config.nul_terminate {
            outbound.push(0);
        }

        stream.write_all(&outbound).await?;
        stream.flush().await?;
        stats.bytes_sent += outbound.len() as u64;
        debug!("Sent {} bytes", outbound.len());
    }

    Ok(stats)
}
