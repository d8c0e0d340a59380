use serde::{Deserialize, Serialize};

use super::{ActionId, Component, ComponentFilter, ComponentKind, EntityId, SCENE_ENTITY};
use crate::proto::MessageType;

/// Closed numeric interval, always stored with `min <= max`. Only built
/// through [`Range::spanning`], so an inverted range cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RangeBounds")]
pub struct Range {
    min: f32,
    max: f32,
}

#[derive(Deserialize)]
struct RangeBounds {
    min: f32,
    max: f32,
}

impl From<RangeBounds> for Range {
    fn from(bounds: RangeBounds) -> Self {
        Self::spanning(bounds.min, bounds.max)
    }
}

impl Range {
    /// Builds a range from two bounds given in either order.
    pub fn spanning(a: f32, b: f32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

impl From<(f32, f32)> for Range {
    fn from((a, b): (f32, f32)) -> Self {
        Self::spanning(a, b)
    }
}

/// One payload variant per operation; the operation tag is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RequestPayload {
    TurnKey { on: bool },
    Move { delta: [f32; 3], units_per_second: f32 },
    PlayerMove { position: [f32; 3], rotation: [f32; 3], units_per_second: f32 },
    UnfocusWindow,
    AddVoxels { replace: bool, size: f32, voxels: Vec<[i32; 3]> },
    ClearVoxels { x: Range, y: Range, z: Range },
    ConfirmAction { action_id: ActionId },
    ListEntities { filter: ComponentFilter },
    CreateEntity,
    GetComponent { kind: ComponentKind },
    AddComponent(Component),
    EditComponent(Component),
}

impl RequestPayload {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::TurnKey { .. } => MessageType::TurnKey,
            Self::Move { .. } => MessageType::Move,
            Self::PlayerMove { .. } => MessageType::PlayerMove,
            Self::UnfocusWindow => MessageType::UnfocusWindow,
            Self::AddVoxels { .. } => MessageType::AddVoxels,
            Self::ClearVoxels { .. } => MessageType::ClearVoxels,
            Self::ConfirmAction { .. } => MessageType::ConfirmAction,
            Self::ListEntities { .. } => MessageType::ListEntities,
            Self::CreateEntity => MessageType::CreateEntity,
            Self::GetComponent { .. } => MessageType::GetComponent,
            Self::AddComponent(_) => MessageType::AddComponent,
            Self::EditComponent(_) => MessageType::EditComponent,
        }
    }
}

/// The request envelope: target entity plus one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub entity_id: EntityId,
    pub payload: RequestPayload,
}

impl Request {
    pub fn new(entity_id: EntityId, payload: RequestPayload) -> Self {
        Self { entity_id, payload }
    }

    /// Global operations always target the scene entity.
    fn global(payload: RequestPayload) -> Self {
        Self::new(SCENE_ENTITY, payload)
    }

    pub fn message_type(&self) -> MessageType {
        self.payload.message_type()
    }

    pub fn turn_key(entity_id: EntityId, on: bool) -> Self {
        Self::new(entity_id, RequestPayload::TurnKey { on })
    }

    pub fn move_entity(entity_id: EntityId, delta: [f32; 3], units_per_second: f32) -> Self {
        Self::new(entity_id, RequestPayload::Move { delta, units_per_second })
    }

    pub fn player_move(position: [f32; 3], rotation: [f32; 3], units_per_second: f32) -> Self {
        Self::global(RequestPayload::PlayerMove {
            position,
            rotation,
            units_per_second,
        })
    }

    pub fn unfocus_window() -> Self {
        Self::global(RequestPayload::UnfocusWindow)
    }

    pub fn add_voxels(voxels: Vec<[i32; 3]>, replace: bool, size: f32) -> Self {
        Self::global(RequestPayload::AddVoxels { replace, size, voxels })
    }

    pub fn clear_voxels(x: impl Into<Range>, y: impl Into<Range>, z: impl Into<Range>) -> Self {
        Self::global(RequestPayload::ClearVoxels {
            x: x.into(),
            y: y.into(),
            z: z.into(),
        })
    }

    pub fn confirm_action(action_id: ActionId) -> Self {
        Self::global(RequestPayload::ConfirmAction { action_id })
    }

    pub fn list_entities(filter: ComponentFilter) -> Self {
        Self::global(RequestPayload::ListEntities { filter })
    }

    pub fn create_entity() -> Self {
        Self::global(RequestPayload::CreateEntity)
    }

    pub fn get_component(entity_id: EntityId, kind: ComponentKind) -> Self {
        Self::new(entity_id, RequestPayload::GetComponent { kind })
    }

    pub fn add_component(entity_id: EntityId, component: Component) -> Self {
        Self::new(entity_id, RequestPayload::AddComponent(component))
    }

    pub fn edit_component(entity_id: EntityId, component: Component) -> Self {
        Self::new(entity_id, RequestPayload::EditComponent(component))
    }
}
