use crate::transport::{Transport, ZmqTransport};
use crate::types::{Request, Response};
use crate::{codec, ApiConfig, ApiError, Result};

/// Typed client for the engine API.
///
/// Exchanges are strictly sequential: `send` takes `&mut self`, so a client can
/// never have two requests outstanding. Callers that need concurrency use
/// separate clients. There is no timeout, retry, or backoff; a stalled server
/// stalls the awaiting caller.
#[derive(Debug)]
pub struct ApiClient<T: Transport = ZmqTransport> {
    transport: T,
    closed: bool,
}

impl ApiClient<ZmqTransport> {
    pub async fn connect(config: &ApiConfig) -> Result<Self> {
        let transport = ZmqTransport::connect(&config.endpoint).await?;
        Ok(Self::with_transport(transport))
    }
}

impl<T: Transport> ApiClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            closed: false,
        }
    }

    /// Sends one request and waits for its reply. `success=false` is returned
    /// as-is; use [`ApiClient::call`] to treat it as an error.
    pub async fn send(&mut self, request: &Request) -> Result<Response> {
        if self.closed {
            return Err(ApiError::Closed);
        }

        let operation = request.message_type();
        let bytes = codec::encode_request(request);

        tracing::debug!(
            "Sending request: type={}, entity={}, bytes={}",
            operation.as_str_name(),
            request.entity_id,
            bytes.len()
        );

        let reply = self.transport.request(bytes).await?;
        let response = codec::decode_response(&reply).map_err(|e| {
            tracing::warn!(
                "Unparsable reply to {}: {}",
                operation.as_str_name(),
                e
            );
            e
        })?;

        tracing::debug!(
            "Received response: type={}, success={}, request_id={}",
            operation.as_str_name(),
            response.success,
            response.request_id
        );

        Ok(response)
    }

    /// Like [`ApiClient::send`], but a `success=false` reply becomes
    /// [`ApiError::OperationFailed`].
    pub async fn call(&mut self, request: &Request) -> Result<Response> {
        let response = self.send(request).await?;

        if !response.success {
            // The wire has a single failure signal; we cannot tell a rejected
            // request from one the server failed to parse.
            tracing::warn!(
                "Server reported failure: type={}, entity={} (rejected or malformed request)",
                request.message_type().as_str_name(),
                request.entity_id
            );
            return Err(ApiError::OperationFailed {
                operation: request.message_type(),
                entity_id: request.entity_id,
            });
        }

        Ok(response)
    }

    /// Releases the connection. Safe to call more than once.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.transport.close().await
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
