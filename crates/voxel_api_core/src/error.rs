use crate::proto::MessageType;
use crate::types::EntityId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Connection error ({endpoint}): {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: zeromq::ZmqError,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] zeromq::ZmqError),

    #[error("Malformed response: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server answered `success=false`. The wire carries no reason, so this
    /// covers both a request rejected by the server and one it could not parse.
    #[error("{operation:?} failed for entity {entity_id} (rejected or malformed request)")]
    OperationFailed {
        operation: MessageType,
        entity_id: EntityId,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Client is closed")]
    Closed,
}

impl ApiError {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Errors after which the session is still usable.
    ///
    /// A malformed reply still completes the REQ/REP exchange, so the socket
    /// stays in a valid state; connection and transport failures do not.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::OperationFailed { .. }
                | Self::InvalidInput(_)
                | Self::Protocol(_)
                | Self::Decode(_)
        )
    }
}
