//! In-process stand-in for the engine, speaking the real wire encoding.
//!
//! The fake keeps just enough state to make the client contract observable:
//! entities and their components, a voxel set, pending clear actions, and a log
//! of every request it decoded.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::codec;
use crate::proto::MessageType;
use crate::transport::Transport;
use crate::types::{
    ActionId, Component, ComponentFilter, EntityId, EntityInfo, Model, Positionable, Range,
    Request, RequestPayload, Response,
};
use crate::Result;

#[derive(Debug, Default)]
struct EntityRecord {
    positionable: Option<Positionable>,
    model: Option<Model>,
}

impl EntityRecord {
    fn info(&self, entity_id: EntityId) -> EntityInfo {
        let mut kinds = Vec::new();
        if self.positionable.is_some() {
            kinds.push(crate::ComponentKind::Positionable);
        }
        if self.model.is_some() {
            kinds.push(crate::ComponentKind::Model);
        }
        EntityInfo::new(entity_id, kinds)
    }

    fn matches(&self, filter: ComponentFilter) -> bool {
        match filter {
            ComponentFilter::Any => true,
            ComponentFilter::Positionable => self.positionable.is_some(),
            ComponentFilter::Model => self.model.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingClear {
    x: Range,
    y: Range,
    z: Range,
}

#[derive(Debug)]
struct FakeState {
    entities: BTreeMap<EntityId, EntityRecord>,
    next_entity_id: EntityId,
    voxels: BTreeSet<[i32; 3]>,
    voxel_size: f32,
    pending: BTreeMap<ActionId, PendingClear>,
    next_action_id: ActionId,
    next_request_id: i64,
    rejected: HashSet<MessageType>,
    garbage_replies: usize,
    requests: Vec<Request>,
    closes: usize,
}

impl Default for FakeState {
    fn default() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_entity_id: 1,
            voxels: BTreeSet::new(),
            voxel_size: 1.0,
            pending: BTreeMap::new(),
            next_action_id: 1,
            next_request_id: 0,
            rejected: HashSet::new(),
            garbage_replies: 0,
            requests: Vec::new(),
            closes: 0,
        }
    }
}

/// Cloneable handle; clones share state so a test can keep one handle while
/// the client owns another.
#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    state: Arc<Mutex<FakeState>>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Inserts an entity with the given id and components.
    pub fn with_entity(
        self,
        entity_id: EntityId,
        positionable: Option<Positionable>,
        model: Option<Model>,
    ) -> Self {
        {
            let mut state = self.state();
            state
                .entities
                .insert(entity_id, EntityRecord { positionable, model });
            state.next_entity_id = state.next_entity_id.max(entity_id + 1);
        }
        self
    }

    /// Every subsequent request of this type is answered with `success=false`.
    pub fn reject(&self, operation: MessageType) {
        self.state().rejected.insert(operation);
    }

    /// The next reply is bytes that do not parse as a response.
    pub fn reply_with_garbage_once(&self) {
        self.state().garbage_replies += 1;
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    pub fn requests_of(&self, operation: MessageType) -> Vec<Request> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.message_type() == operation)
            .cloned()
            .collect()
    }

    pub fn last_request(&self) -> Option<Request> {
        self.state().requests.last().cloned()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    pub fn voxels(&self) -> Vec<[i32; 3]> {
        self.state().voxels.iter().copied().collect()
    }

    pub fn voxel_size(&self) -> f32 {
        self.state().voxel_size
    }

    pub fn pending_actions(&self) -> Vec<ActionId> {
        self.state().pending.keys().copied().collect()
    }

    pub fn component(&self, entity_id: EntityId, kind: crate::ComponentKind) -> Option<Component> {
        let state = self.state();
        let record = state.entities.get(&entity_id)?;
        match kind {
            crate::ComponentKind::Positionable => record.positionable.map(Component::Positionable),
            crate::ComponentKind::Model => record.model.clone().map(Component::Model),
        }
    }

    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.state().entities.keys().copied().collect()
    }

    pub fn close_count(&self) -> usize {
        self.state().closes
    }

    fn handle(state: &mut FakeState, request: &Request) -> Response {
        if state.rejected.contains(&request.message_type()) {
            return Response::failed();
        }

        match &request.payload {
            RequestPayload::TurnKey { .. } | RequestPayload::Move { .. } => {
                if state.entities.contains_key(&request.entity_id) {
                    Response::ok()
                } else {
                    Response::failed()
                }
            }
            RequestPayload::PlayerMove { .. } | RequestPayload::UnfocusWindow => Response::ok(),
            RequestPayload::AddVoxels {
                replace,
                size,
                voxels,
            } => {
                if *replace {
                    state.voxels.clear();
                }
                state.voxels.extend(voxels.iter().copied());
                if *size > 0.0 {
                    state.voxel_size = *size;
                }
                Response::ok()
            }
            RequestPayload::ClearVoxels { x, y, z } => {
                let action_id = state.next_action_id;
                state.next_action_id += 1;
                state.pending.insert(
                    action_id,
                    PendingClear {
                        x: *x,
                        y: *y,
                        z: *z,
                    },
                );
                Response::ok().with_action_id(action_id)
            }
            RequestPayload::ConfirmAction { action_id } => match state.pending.remove(action_id) {
                Some(clear) => {
                    state.voxels.retain(|&[vx, vy, vz]| {
                        !(clear.x.contains(vx as f32)
                            && clear.y.contains(vy as f32)
                            && clear.z.contains(vz as f32))
                    });
                    Response::ok()
                }
                None => Response::failed(),
            },
            RequestPayload::ListEntities { filter } => {
                // Listing order is up to the server; hand it out newest first.
                let entities = state
                    .entities
                    .iter()
                    .rev()
                    .filter(|(_, record)| record.matches(*filter))
                    .map(|(id, record)| record.info(*id))
                    .collect();
                Response::ok().with_entities(entities)
            }
            RequestPayload::CreateEntity => {
                let entity_id = state.next_entity_id;
                state.next_entity_id += 1;
                state.entities.insert(entity_id, EntityRecord::default());
                Response::ok()
            }
            RequestPayload::GetComponent { kind } => {
                let component = state.entities.get(&request.entity_id).and_then(|record| match kind {
                    crate::ComponentKind::Positionable => {
                        record.positionable.map(Component::Positionable)
                    }
                    crate::ComponentKind::Model => record.model.clone().map(Component::Model),
                });
                match component {
                    Some(component) => Response::ok().with_component(component),
                    None => Response::failed(),
                }
            }
            RequestPayload::AddComponent(component) => {
                let Some(record) = state.entities.get_mut(&request.entity_id) else {
                    return Response::failed();
                };
                match component {
                    Component::Positionable(p) if record.positionable.is_none() => {
                        record.positionable = Some(*p);
                        Response::ok()
                    }
                    Component::Model(m) if record.model.is_none() => {
                        record.model = Some(m.clone());
                        Response::ok()
                    }
                    _ => Response::failed(),
                }
            }
            RequestPayload::EditComponent(component) => {
                let Some(record) = state.entities.get_mut(&request.entity_id) else {
                    return Response::failed();
                };
                match component {
                    Component::Positionable(p) if record.positionable.is_some() => {
                        record.positionable = Some(*p);
                        Response::ok()
                    }
                    Component::Model(m) if record.model.is_some() => {
                        record.model = Some(m.clone());
                        Response::ok()
                    }
                    _ => Response::failed(),
                }
            }
        }
    }
}

impl Transport for FakeServer {
    async fn request(&mut self, payload: Vec<u8>) -> Result<Vec<u8>> {
        let mut state = self.state();
        state.next_request_id += 1;
        let request_id = state.next_request_id;

        if state.garbage_replies > 0 {
            state.garbage_replies -= 1;
            return Ok(vec![0xff, 0xff, 0xff]);
        }

        let mut response = match codec::decode_request(&payload) {
            Ok(request) => {
                let response = Self::handle(&mut state, &request);
                state.requests.push(request);
                response
            }
            Err(_) => Response::failed(),
        };
        response.request_id = request_id;

        Ok(codec::encode_response(&response))
    }

    async fn close(&mut self) -> Result<()> {
        self.state().closes += 1;
        Ok(())
    }
}
