use zeromq::{Socket, SocketRecv, SocketSend, ZmqMessage};

use crate::{ApiError, Result};

/// A strict request/reply byte channel: each `request` is answered by exactly
/// one reply before the next may be sent.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn request(&mut self, payload: Vec<u8>) -> Result<Vec<u8>>;

    /// Releases the underlying resources. Calling it again is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// ZeroMQ REQ socket connected to the engine's REP endpoint.
pub struct ZmqTransport {
    endpoint: String,
    socket: Option<zeromq::ReqSocket>,
}

impl ZmqTransport {
    /// Connects once. A refused or unreachable TCP peer is reported as
    /// [`ApiError::Connection`] instead of being retried.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        if let Some(address) = endpoint.strip_prefix("tcp://") {
            // zeromq's own connect retries refused peers forever, so make
            // exactly one plain TCP attempt first.
            tokio::net::TcpStream::connect(address)
                .await
                .map_err(|e| ApiError::Connection {
                    endpoint: endpoint.to_string(),
                    source: zeromq::ZmqError::from(e),
                })?;
        }

        let mut socket = zeromq::ReqSocket::new();
        socket
            .connect(endpoint)
            .await
            .map_err(|source| ApiError::Connection {
                endpoint: endpoint.to_string(),
                source,
            })?;

        tracing::info!("Connected REQ socket to {}", endpoint);

        Ok(Self {
            endpoint: endpoint.to_string(),
            socket: Some(socket),
        })
    }
}

impl Transport for ZmqTransport {
    async fn request(&mut self, payload: Vec<u8>) -> Result<Vec<u8>> {
        let socket = self.socket.as_mut().ok_or(ApiError::Closed)?;

        socket.send(ZmqMessage::from(payload)).await?;
        let reply = socket.recv().await?;

        let mut frames = reply.into_vec();
        if frames.len() != 1 {
            return Err(ApiError::protocol(format!(
                "expected a single-frame reply, got {} frames",
                frames.len()
            )));
        }

        Ok(frames.remove(0).to_vec())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(socket) = self.socket.take() {
            drop(socket);
            tracing::info!("Closed REQ socket to {}", self.endpoint);
        }
        Ok(())
    }
}

impl std::fmt::Debug for ZmqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZmqTransport")
            .field("endpoint", &self.endpoint)
            .field("open", &self.socket.is_some())
            .finish()
    }
}
