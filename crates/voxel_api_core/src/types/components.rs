use serde::{Deserialize, Serialize};

/// Component types the engine exposes over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComponentKind {
    Positionable,
    Model,
}

impl ComponentKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Positionable => "Positionable",
            Self::Model => "Model",
        }
    }
}

/// Entity listing filter. `Any` is sent as the unspecified component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComponentFilter {
    #[default]
    Any,
    Positionable,
    Model,
}

impl ComponentFilter {
    /// Any -> Positionable -> Model -> Any
    pub fn next(self) -> Self {
        match self {
            Self::Any => Self::Positionable,
            Self::Positionable => Self::Model,
            Self::Model => Self::Any,
        }
    }

    pub fn kind(self) -> Option<ComponentKind> {
        match self {
            Self::Any => None,
            Self::Positionable => Some(ComponentKind::Positionable),
            Self::Model => Some(ComponentKind::Model),
        }
    }

    pub fn label(self) -> &'static str {
        match self.kind() {
            Some(kind) => kind.label(),
            None => "All",
        }
    }
}

impl From<ComponentKind> for ComponentFilter {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Positionable => Self::Positionable,
            ComponentKind::Model => Self::Model,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Positionable {
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub origin: [f32; 3],
    pub scale: f32,
}

impl Default for Positionable {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            origin: [0.0; 3],
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub path: String,
}

impl Model {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// A typed attachment on an entity. At most one of each kind per entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Component {
    Positionable(Positionable),
    Model(Model),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Positionable(_) => ComponentKind::Positionable,
            Self::Model(_) => ComponentKind::Model,
        }
    }

    pub fn as_positionable(&self) -> Option<&Positionable> {
        match self {
            Self::Positionable(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            Self::Model(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Positionable> for Component {
    fn from(positionable: Positionable) -> Self {
        Self::Positionable(positionable)
    }
}

impl From<Model> for Component {
    fn from(model: Model) -> Self {
        Self::Model(model)
    }
}
