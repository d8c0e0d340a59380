//! Wire schema of the engine API (`api.proto`, proto3).
//!
//! The schema is owned by the engine; these types mirror it field-for-field and
//! tag-for-tag so that encoded bytes are interchangeable with the engine's own
//! protobuf code. Nothing outside [`crate::codec`] should need to touch them.

/// Request operation tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MessageType {
    Move = 0,
    TurnKey = 1,
    PlayerMove = 2,
    UnfocusWindow = 3,
    AddVoxels = 4,
    ClearVoxels = 5,
    ConfirmAction = 6,
    ListEntities = 7,
    CreateEntity = 8,
    GetComponent = 9,
    AddComponent = 10,
    EditComponent = 11,
}

impl MessageType {
    /// Name of the value as it appears in the `.proto` definition.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::Move => "MOVE",
            Self::TurnKey => "TURN_KEY",
            Self::PlayerMove => "PLAYER_MOVE",
            Self::UnfocusWindow => "UNFOCUS_WINDOW",
            Self::AddVoxels => "ADD_VOXELS",
            Self::ClearVoxels => "CLEAR_VOXELS",
            Self::ConfirmAction => "CONFIRM_ACTION",
            Self::ListEntities => "LIST_ENTITIES",
            Self::CreateEntity => "CREATE_ENTITY",
            Self::GetComponent => "GET_COMPONENT",
            Self::AddComponent => "ADD_COMPONENT",
            Self::EditComponent => "EDIT_COMPONENT",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ComponentType {
    Unspecified = 0,
    Positionable = 1,
    Model = 2,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Vector {
    #[prost(float, tag = "1")]
    pub x: f32,
    #[prost(float, tag = "2")]
    pub y: f32,
    #[prost(float, tag = "3")]
    pub z: f32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct VoxelCoord {
    #[prost(int32, tag = "1")]
    pub x: i32,
    #[prost(int32, tag = "2")]
    pub y: i32,
    #[prost(int32, tag = "3")]
    pub z: i32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Range {
    #[prost(float, tag = "1")]
    pub min: f32,
    #[prost(float, tag = "2")]
    pub max: f32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct TurnKey {
    #[prost(bool, tag = "1")]
    pub on: bool,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Move {
    #[prost(float, tag = "1")]
    pub x_delta: f32,
    #[prost(float, tag = "2")]
    pub y_delta: f32,
    #[prost(float, tag = "3")]
    pub z_delta: f32,
    #[prost(float, tag = "4")]
    pub units_per_second: f32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct PlayerMove {
    #[prost(message, optional, tag = "1")]
    pub position: Option<Vector>,
    #[prost(message, optional, tag = "2")]
    pub rotation: Option<Vector>,
    #[prost(float, tag = "3")]
    pub units_per_second: f32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct NoPayload {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddVoxels {
    #[prost(bool, tag = "1")]
    pub replace: bool,
    #[prost(float, tag = "2")]
    pub size: f32,
    #[prost(message, repeated, tag = "3")]
    pub voxels: Vec<VoxelCoord>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ClearVoxels {
    #[prost(message, optional, tag = "1")]
    pub x: Option<Range>,
    #[prost(message, optional, tag = "2")]
    pub y: Option<Range>,
    #[prost(message, optional, tag = "3")]
    pub z: Option<Range>,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ConfirmAction {
    #[prost(int64, tag = "1")]
    pub action_id: i64,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct ListEntities {
    #[prost(enumeration = "ComponentType", tag = "1")]
    pub filter_type: i32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct CreateEntity {}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct GetComponent {
    #[prost(enumeration = "ComponentType", tag = "1")]
    pub component_type: i32,
}

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct PositionableComponent {
    #[prost(message, optional, tag = "1")]
    pub position: Option<Vector>,
    #[prost(message, optional, tag = "2")]
    pub rotation: Option<Vector>,
    #[prost(message, optional, tag = "3")]
    pub origin: Option<Vector>,
    #[prost(float, tag = "4")]
    pub scale: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ModelComponent {
    #[prost(string, tag = "1")]
    pub model_path: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Component {
    #[prost(enumeration = "ComponentType", tag = "1")]
    pub r#type: i32,
    #[prost(oneof = "component::Data", tags = "2, 3")]
    pub data: Option<component::Data>,
}

pub mod component {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "2")]
        Positionable(super::PositionableComponent),
        #[prost(message, tag = "3")]
        Model(super::ModelComponent),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddComponent {
    #[prost(message, optional, tag = "1")]
    pub component: Option<Component>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EditComponent {
    #[prost(message, optional, tag = "1")]
    pub component: Option<Component>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApiRequest {
    #[prost(int64, tag = "1")]
    pub entity_id: i64,
    #[prost(enumeration = "MessageType", tag = "2")]
    pub r#type: i32,
    #[prost(oneof = "api_request::Payload", tags = "3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14")]
    pub payload: Option<api_request::Payload>,
}

pub mod api_request {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Payload {
        #[prost(message, tag = "3")]
        Move(super::Move),
        #[prost(message, tag = "4")]
        TurnKey(super::TurnKey),
        #[prost(message, tag = "5")]
        PlayerMove(super::PlayerMove),
        #[prost(message, tag = "6")]
        NoPayload(super::NoPayload),
        #[prost(message, tag = "7")]
        AddVoxels(super::AddVoxels),
        #[prost(message, tag = "8")]
        ClearVoxels(super::ClearVoxels),
        #[prost(message, tag = "9")]
        ConfirmAction(super::ConfirmAction),
        #[prost(message, tag = "10")]
        ListEntities(super::ListEntities),
        #[prost(message, tag = "11")]
        CreateEntity(super::CreateEntity),
        #[prost(message, tag = "12")]
        GetComponent(super::GetComponent),
        #[prost(message, tag = "13")]
        AddComponent(super::AddComponent),
        #[prost(message, tag = "14")]
        EditComponent(super::EditComponent),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EntityComponents {
    #[prost(int64, tag = "1")]
    pub entity_id: i64,
    #[prost(enumeration = "ComponentType", repeated, tag = "2")]
    pub component_types: Vec<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ApiRequestResponse {
    #[prost(int64, tag = "1")]
    pub request_id: i64,
    #[prost(bool, tag = "2")]
    pub success: bool,
    #[prost(int64, optional, tag = "3")]
    pub action_id: Option<i64>,
    #[prost(message, repeated, tag = "4")]
    pub entity_components: Vec<EntityComponents>,
    #[prost(message, optional, tag = "5")]
    pub component: Option<Component>,
}
