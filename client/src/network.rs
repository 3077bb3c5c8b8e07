//! Client side of the request/response exchange

use log::{debug, info};
use protocol::{parse, Request, Response};
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;

/// Upper bound on a single response, guards against a server that never stops
pub const MAX_RESPONSE_SIZE: usize = 64 * 1024;

const READ_CHUNK: usize = 1024;

pub struct Client<S = TcpStream> {
    stream: S,
}

impl Client<TcpStream> {
    pub async fn connect(server_addr: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let stream = TcpStream::connect(server_addr).await?;
        stream.set_nodelay(true)?;
        info!("Connected to {}", stream.peer_addr()?);
        Ok(Client { stream })
    }
}

impl<S> Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn from_stream(stream: S) -> Self {
        Client { stream }
    }

    /// Sends raw bytes and reads back one response.
    ///
    /// Reads until the received bytes form a complete XML document, with any
    /// NUL terminator removed.
    pub async fn send_raw(&mut self, request: &[u8]) -> io::Result<Vec<u8>> {
        self.stream.write_all(request).await?;
        self.stream.flush().await?;
        debug!("Sent {} bytes", request.len());

        let mut response = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let len = self.stream.read(&mut chunk).await?;
            if len == 0 {
                if response.is_empty() {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "server closed the connection",
                    ));
                }
                break;
            }

            response.extend_from_slice(&chunk[..len]);
            while response.last() == Some(&0) {
                response.pop();
            }

            if parse(&response).is_ok() {
                break;
            }
            if response.len() > MAX_RESPONSE_SIZE {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "response exceeds maximum size",
                ));
            }
        }

        debug!("Received {} bytes", response.len());
        Ok(response)
    }

    /// Sends a request and decodes the response
    pub async fn send_request(
        &mut self,
        request: &Request,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let bytes = self.send_raw(&request.to_bytes()).await?;
        let document = parse(&bytes)?;
        let response = Response::from_document(&document)
            .ok_or("server reply is not a Response document")?;
        Ok(response)
    }

    pub async fn get_player_info(
        &mut self,
        card_number: &str,
        pin: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_request(&Request::new("GetPlayerInfo", card_number, pin))
            .await
    }
}
