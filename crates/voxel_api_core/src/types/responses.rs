use serde::{Deserialize, Serialize};

use super::{ActionId, Component, ComponentKind, EntityId};

/// One row of an entity listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInfo {
    pub entity_id: EntityId,
    pub component_types: Vec<ComponentKind>,
}

impl EntityInfo {
    pub fn new(entity_id: EntityId, component_types: Vec<ComponentKind>) -> Self {
        Self {
            entity_id,
            component_types,
        }
    }

    pub fn has(&self, kind: ComponentKind) -> bool {
        self.component_types.contains(&kind)
    }

    /// "Positionable, Model", or "-" for a bare entity.
    pub fn describe_components(&self) -> String {
        if self.component_types.is_empty() {
            return "-".to_string();
        }
        self.component_types
            .iter()
            .map(|kind| kind.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The response envelope. Everything but `success` is only meaningful when
/// `success` is true; a failure carries no further detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub request_id: i64,
    pub success: bool,
    pub action_id: Option<ActionId>,
    pub entities: Vec<EntityInfo>,
    pub component: Option<Component>,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn failed() -> Self {
        Self::default()
    }

    pub fn with_action_id(mut self, action_id: ActionId) -> Self {
        self.action_id = Some(action_id);
        self
    }

    pub fn with_entities(mut self, entities: Vec<EntityInfo>) -> Self {
        self.entities = entities;
        self
    }

    pub fn with_component(mut self, component: Component) -> Self {
        self.component = Some(component);
        self
    }
}
