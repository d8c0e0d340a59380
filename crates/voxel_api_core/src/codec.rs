//! Conversion between the typed request/response envelopes and protobuf bytes.

use prost::Message;

use crate::proto::{self, api_request::Payload, component::Data, ComponentType, MessageType};
use crate::types::{
    Component, ComponentFilter, ComponentKind, EntityInfo, Model, Positionable, Range, Request,
    RequestPayload, Response,
};
use crate::{ApiError, Result};

pub fn encode_request(request: &Request) -> Vec<u8> {
    request_to_wire(request).encode_to_vec()
}

pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    let wire = proto::ApiRequest::decode(bytes)?;
    request_from_wire(wire)
}

pub fn encode_response(response: &Response) -> Vec<u8> {
    response_to_wire(response).encode_to_vec()
}

pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let wire = proto::ApiRequestResponse::decode(bytes)?;
    response_from_wire(wire)
}

fn request_to_wire(request: &Request) -> proto::ApiRequest {
    let payload = match &request.payload {
        RequestPayload::TurnKey { on } => Payload::TurnKey(proto::TurnKey { on: *on }),
        RequestPayload::Move {
            delta,
            units_per_second,
        } => Payload::Move(proto::Move {
            x_delta: delta[0],
            y_delta: delta[1],
            z_delta: delta[2],
            units_per_second: *units_per_second,
        }),
        RequestPayload::PlayerMove {
            position,
            rotation,
            units_per_second,
        } => Payload::PlayerMove(proto::PlayerMove {
            position: Some(vector_to_wire(*position)),
            rotation: Some(vector_to_wire(*rotation)),
            units_per_second: *units_per_second,
        }),
        RequestPayload::UnfocusWindow => Payload::NoPayload(proto::NoPayload {}),
        RequestPayload::AddVoxels {
            replace,
            size,
            voxels,
        } => Payload::AddVoxels(proto::AddVoxels {
            replace: *replace,
            size: *size,
            voxels: voxels
                .iter()
                .map(|&[x, y, z]| proto::VoxelCoord { x, y, z })
                .collect(),
        }),
        RequestPayload::ClearVoxels { x, y, z } => Payload::ClearVoxels(proto::ClearVoxels {
            x: Some(range_to_wire(*x)),
            y: Some(range_to_wire(*y)),
            z: Some(range_to_wire(*z)),
        }),
        RequestPayload::ConfirmAction { action_id } => {
            Payload::ConfirmAction(proto::ConfirmAction {
                action_id: *action_id,
            })
        }
        RequestPayload::ListEntities { filter } => Payload::ListEntities(proto::ListEntities {
            filter_type: filter_to_wire(*filter) as i32,
        }),
        RequestPayload::CreateEntity => Payload::CreateEntity(proto::CreateEntity {}),
        RequestPayload::GetComponent { kind } => Payload::GetComponent(proto::GetComponent {
            component_type: kind_to_wire(*kind) as i32,
        }),
        RequestPayload::AddComponent(component) => Payload::AddComponent(proto::AddComponent {
            component: Some(component_to_wire(component)),
        }),
        RequestPayload::EditComponent(component) => {
            Payload::EditComponent(proto::EditComponent {
                component: Some(component_to_wire(component)),
            })
        }
    };

    proto::ApiRequest {
        entity_id: request.entity_id,
        r#type: request.message_type() as i32,
        payload: Some(payload),
    }
}

fn request_from_wire(wire: proto::ApiRequest) -> Result<Request> {
    let tag = MessageType::try_from(wire.r#type)
        .map_err(|_| ApiError::protocol(format!("unknown message type {}", wire.r#type)))?;

    let payload = match (tag, wire.payload) {
        (MessageType::TurnKey, Some(Payload::TurnKey(m))) => RequestPayload::TurnKey { on: m.on },
        (MessageType::Move, Some(Payload::Move(m))) => RequestPayload::Move {
            delta: [m.x_delta, m.y_delta, m.z_delta],
            units_per_second: m.units_per_second,
        },
        (MessageType::PlayerMove, Some(Payload::PlayerMove(m))) => RequestPayload::PlayerMove {
            position: vector_from_wire(m.position),
            rotation: vector_from_wire(m.rotation),
            units_per_second: m.units_per_second,
        },
        (MessageType::UnfocusWindow, Some(Payload::NoPayload(_)) | None) => {
            RequestPayload::UnfocusWindow
        }
        (MessageType::AddVoxels, Some(Payload::AddVoxels(m))) => RequestPayload::AddVoxels {
            replace: m.replace,
            size: m.size,
            voxels: m.voxels.iter().map(|v| [v.x, v.y, v.z]).collect(),
        },
        (MessageType::ClearVoxels, Some(Payload::ClearVoxels(m))) => RequestPayload::ClearVoxels {
            x: range_from_wire(m.x),
            y: range_from_wire(m.y),
            z: range_from_wire(m.z),
        },
        (MessageType::ConfirmAction, Some(Payload::ConfirmAction(m))) => {
            RequestPayload::ConfirmAction {
                action_id: m.action_id,
            }
        }
        (MessageType::ListEntities, Some(Payload::ListEntities(m))) => {
            let filter = match kind_from_wire(m.filter_type)? {
                Some(kind) => ComponentFilter::from(kind),
                None => ComponentFilter::Any,
            };
            RequestPayload::ListEntities { filter }
        }
        (MessageType::CreateEntity, Some(Payload::CreateEntity(_)) | None) => {
            RequestPayload::CreateEntity
        }
        (MessageType::GetComponent, Some(Payload::GetComponent(m))) => {
            let kind = kind_from_wire(m.component_type)?
                .ok_or_else(|| ApiError::protocol("GET_COMPONENT without a component type"))?;
            RequestPayload::GetComponent { kind }
        }
        (MessageType::AddComponent, Some(Payload::AddComponent(m))) => {
            RequestPayload::AddComponent(required_component(m.component)?)
        }
        (MessageType::EditComponent, Some(Payload::EditComponent(m))) => {
            RequestPayload::EditComponent(required_component(m.component)?)
        }
        (tag, _) => {
            return Err(ApiError::protocol(format!(
                "payload does not match message type {}",
                tag.as_str_name()
            )))
        }
    };

    Ok(Request::new(wire.entity_id, payload))
}

fn response_to_wire(response: &Response) -> proto::ApiRequestResponse {
    proto::ApiRequestResponse {
        request_id: response.request_id,
        success: response.success,
        action_id: response.action_id,
        entity_components: response
            .entities
            .iter()
            .map(|info| proto::EntityComponents {
                entity_id: info.entity_id,
                component_types: info
                    .component_types
                    .iter()
                    .map(|kind| kind_to_wire(*kind) as i32)
                    .collect(),
            })
            .collect(),
        component: response.component.as_ref().map(component_to_wire),
    }
}

fn response_from_wire(wire: proto::ApiRequestResponse) -> Result<Response> {
    let entities = wire
        .entity_components
        .into_iter()
        .map(|row| {
            let component_types = row
                .component_types
                .into_iter()
                .filter_map(|value| match kind_from_wire(value) {
                    Ok(kind) => kind,
                    Err(_) => {
                        tracing::debug!(
                            "Ignoring unknown component type {} on entity {}",
                            value,
                            row.entity_id
                        );
                        None
                    }
                })
                .collect();
            EntityInfo::new(row.entity_id, component_types)
        })
        .collect();

    // A component message without data is the engine's way of saying "absent".
    let component = wire
        .component
        .filter(|c| c.data.is_some())
        .map(component_from_wire)
        .transpose()?;

    Ok(Response {
        request_id: wire.request_id,
        success: wire.success,
        action_id: wire.action_id,
        entities,
        component,
    })
}

fn required_component(component: Option<proto::Component>) -> Result<Component> {
    let component = component.ok_or_else(|| ApiError::protocol("missing component payload"))?;
    component_from_wire(component)
}

fn component_to_wire(component: &Component) -> proto::Component {
    let data = match component {
        Component::Positionable(p) => Data::Positionable(proto::PositionableComponent {
            position: Some(vector_to_wire(p.position)),
            rotation: Some(vector_to_wire(p.rotation)),
            origin: Some(vector_to_wire(p.origin)),
            scale: p.scale,
        }),
        Component::Model(m) => Data::Model(proto::ModelComponent {
            model_path: m.path.clone(),
        }),
    };

    proto::Component {
        r#type: kind_to_wire(component.kind()) as i32,
        data: Some(data),
    }
}

fn component_from_wire(wire: proto::Component) -> Result<Component> {
    let declared = kind_from_wire(wire.r#type)?;
    let component = match wire.data {
        Some(Data::Positionable(p)) => Component::Positionable(Positionable {
            position: vector_from_wire(p.position),
            rotation: vector_from_wire(p.rotation),
            origin: vector_from_wire(p.origin),
            scale: p.scale,
        }),
        Some(Data::Model(m)) => Component::Model(Model { path: m.model_path }),
        None => return Err(ApiError::protocol("component carries no data")),
    };

    match declared {
        Some(kind) if kind != component.kind() => Err(ApiError::protocol(format!(
            "component declared as {} carries {} data",
            kind.label(),
            component.kind().label()
        ))),
        _ => Ok(component),
    }
}

fn kind_to_wire(kind: ComponentKind) -> ComponentType {
    match kind {
        ComponentKind::Positionable => ComponentType::Positionable,
        ComponentKind::Model => ComponentType::Model,
    }
}

fn filter_to_wire(filter: ComponentFilter) -> ComponentType {
    filter.kind().map(kind_to_wire).unwrap_or(ComponentType::Unspecified)
}

/// `Ok(None)` for the unspecified type, an error for values outside the schema.
fn kind_from_wire(value: i32) -> Result<Option<ComponentKind>> {
    match ComponentType::try_from(value) {
        Ok(ComponentType::Unspecified) => Ok(None),
        Ok(ComponentType::Positionable) => Ok(Some(ComponentKind::Positionable)),
        Ok(ComponentType::Model) => Ok(Some(ComponentKind::Model)),
        Err(_) => Err(ApiError::protocol(format!("unknown component type {value}"))),
    }
}

fn vector_to_wire([x, y, z]: [f32; 3]) -> proto::Vector {
    proto::Vector { x, y, z }
}

fn vector_from_wire(vector: Option<proto::Vector>) -> [f32; 3] {
    vector.map(|v| [v.x, v.y, v.z]).unwrap_or_default()
}

fn range_to_wire(range: Range) -> proto::Range {
    proto::Range {
        min: range.min(),
        max: range.max(),
    }
}

fn range_from_wire(range: Option<proto::Range>) -> Range {
    range
        .map(|r| Range::spanning(r.min, r.max))
        .unwrap_or(Range::spanning(0.0, 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_request_variant() -> Vec<Request> {
        vec![
            Request::turn_key(4, true),
            Request::move_entity(4, [1.0, -2.5, 0.0], 3.0),
            Request::player_move([1.0, 2.0, 3.0], [0.0, 90.0, 0.0], 10.0),
            Request::unfocus_window(),
            Request::add_voxels(vec![[0, 4, 4], [-1, 0, 7]], false, 0.5),
            Request::add_voxels(vec![], true, 1.0),
            Request::clear_voxels((-1.0, 1.0), (0.0, 2.0), (-1.0, 1.0)),
            Request::new(0, RequestPayload::ClearVoxels {
                x: Range::spanning(4.0, -4.0),
                y: Range::spanning(0.5, 0.5),
                z: Range::spanning(-2.0, 8.0),
            }),
            Request::confirm_action(42),
            Request::list_entities(ComponentFilter::Any),
            Request::list_entities(ComponentFilter::Model),
            Request::create_entity(),
            Request::get_component(9, ComponentKind::Positionable),
            Request::add_component(9, Model::new("models/cube.glb").into()),
            Request::edit_component(
                9,
                Positionable {
                    position: [1.0, 2.0, 3.0],
                    rotation: [0.0, 45.0, 0.0],
                    origin: [0.5, 0.5, 0.5],
                    scale: 2.0,
                }
                .into(),
            ),
        ]
    }

    #[test]
    fn test_request_round_trip_preserves_every_variant() {
        for request in every_request_variant() {
            let decoded = decode_request(&encode_request(&request)).unwrap();
            assert_eq!(decoded, request);
        }
    }

    #[test]
    fn test_clear_ranges_are_normalized_on_the_wire() {
        let forward = Request::clear_voxels((-5.0, 5.0), (0.0, 2.0), (1.0, -1.0));
        let backward = Request::clear_voxels((5.0, -5.0), (2.0, 0.0), (-1.0, 1.0));
        assert_eq!(encode_request(&forward), encode_request(&backward));

        // A payload built by hand from inverted bounds goes out as (min, max).
        let inverted = Request::new(0, RequestPayload::ClearVoxels {
            x: Range::spanning(5.0, -5.0),
            y: Range::spanning(2.0, 0.0),
            z: Range::spanning(1.0, -1.0),
        });
        assert_eq!(encode_request(&inverted), encode_request(&forward));
    }

    #[test]
    fn test_hand_built_clear_round_trips() {
        let request = Request::new(0, RequestPayload::ClearVoxels {
            x: Range::spanning(5.0, -5.0),
            y: (2.0, 0.0).into(),
            z: Range::spanning(-1.0, 1.0),
        });
        let decoded = decode_request(&encode_request(&request)).unwrap();
        assert_eq!(decoded, request);
    }

    #[test]
    fn test_inverted_wire_range_is_normalized_on_decode() {
        let wire = proto::ApiRequest {
            entity_id: 0,
            r#type: MessageType::ClearVoxels as i32,
            payload: Some(Payload::ClearVoxels(proto::ClearVoxels {
                x: Some(proto::Range { min: 3.0, max: -3.0 }),
                y: None,
                z: Some(proto::Range { min: 1.0, max: 1.0 }),
            })),
        };
        let decoded = decode_request(&wire.encode_to_vec()).unwrap();
        match decoded.payload {
            RequestPayload::ClearVoxels { x, y, z } => {
                assert_eq!((x.min(), x.max()), (-3.0, 3.0));
                assert_eq!((y.min(), y.max()), (0.0, 0.0));
                assert_eq!((z.min(), z.max()), (1.0, 1.0));
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_wire_tag_matches_payload() {
        let wire = request_to_wire(&Request::add_voxels(vec![[0, 4, 4]], true, 2.0));
        assert_eq!(wire.r#type, MessageType::AddVoxels as i32);
        assert_eq!(wire.entity_id, 0);
        match wire.payload {
            Some(Payload::AddVoxels(m)) => {
                assert!(m.replace);
                assert_eq!(m.size, 2.0);
                assert_eq!(m.voxels, vec![proto::VoxelCoord { x: 0, y: 4, z: 4 }]);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_payload_is_rejected() {
        let wire = proto::ApiRequest {
            entity_id: 1,
            r#type: MessageType::TurnKey as i32,
            payload: Some(Payload::Move(proto::Move::default())),
        };
        let err = decode_request(&wire.encode_to_vec()).unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
        assert!(err.to_string().contains("TURN_KEY"));
    }

    #[test]
    fn test_payloadless_unfocus_is_accepted() {
        let wire = proto::ApiRequest {
            entity_id: 0,
            r#type: MessageType::UnfocusWindow as i32,
            payload: None,
        };
        let request = decode_request(&wire.encode_to_vec()).unwrap();
        assert_eq!(request, Request::unfocus_window());
    }

    #[test]
    fn test_response_round_trip() {
        let response = Response {
            request_id: 17,
            success: true,
            action_id: Some(0),
            entities: vec![
                EntityInfo::new(2, vec![ComponentKind::Model]),
                EntityInfo::new(1, vec![]),
            ],
            component: Some(Model::new("m.obj").into()),
        };
        assert_eq!(decode_response(&encode_response(&response)).unwrap(), response);

        // An explicit zero action id is distinct from no action id.
        let without = decode_response(&encode_response(&Response::ok())).unwrap();
        assert_eq!(without.action_id, None);
    }

    #[test]
    fn test_garbage_response_is_a_decode_error() {
        let err = decode_response(&[0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn test_component_type_mismatch_is_a_protocol_error() {
        let wire = proto::ApiRequestResponse {
            success: true,
            component: Some(proto::Component {
                r#type: ComponentType::Model as i32,
                data: Some(Data::Positionable(proto::PositionableComponent::default())),
            }),
            ..Default::default()
        };
        let err = decode_response(&wire.encode_to_vec()).unwrap_err();
        assert!(matches!(err, ApiError::Protocol(_)));
    }

    #[test]
    fn test_empty_component_reads_as_absent() {
        let wire = proto::ApiRequestResponse {
            success: true,
            component: Some(proto::Component {
                r#type: ComponentType::Positionable as i32,
                data: None,
            }),
            ..Default::default()
        };
        let response = decode_response(&wire.encode_to_vec()).unwrap();
        assert!(response.component.is_none());
    }

    #[test]
    fn test_unknown_component_types_in_listing_are_skipped() {
        let wire = proto::ApiRequestResponse {
            success: true,
            entity_components: vec![proto::EntityComponents {
                entity_id: 5,
                component_types: vec![ComponentType::Positionable as i32, 99, 0],
            }],
            ..Default::default()
        };
        let response = decode_response(&wire.encode_to_vec()).unwrap();
        assert_eq!(
            response.entities,
            vec![EntityInfo::new(5, vec![ComponentKind::Positionable])]
        );
    }
}
