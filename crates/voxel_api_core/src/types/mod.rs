mod components;
mod requests;
mod responses;

pub use components::{Component, ComponentFilter, ComponentKind, Model, Positionable};
pub use requests::{Range, Request, RequestPayload};
pub use responses::{EntityInfo, Response};

/// Engine entity identifier.
pub type EntityId = i64;

/// Identifier of a pending, unconfirmed server-side action.
pub type ActionId = i64;

/// Entity id used by operations that address the scene as a whole.
pub const SCENE_ENTITY: EntityId = 0;
