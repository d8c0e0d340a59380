//! Voxel API Core
//!
//! A reusable async client for the voxel engine's request/response API over ZeroMQ.
//! Provides structured config, error handling, the protobuf wire schema, and typed
//! high-level operations for driving a running engine instance.

pub mod codec;
pub mod config;
pub mod error;
pub mod client;
pub mod ops;
pub mod proto;
pub mod transport;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// Re-export commonly used types
pub use config::ApiConfig;
pub use error::ApiError;
pub use client::ApiClient;
pub use transport::{Transport, ZmqTransport};
pub use types::{
    ActionId, Component, ComponentFilter, ComponentKind, EntityId, EntityInfo, Model,
    Positionable, Range, Request, RequestPayload, Response, SCENE_ENTITY,
};
pub use proto::MessageType;

/// Result type alias using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
