use clap::{Subcommand, ValueEnum};
use serde_json::{json, Value};
use voxel_api_core::ops::{control, entities, voxels};
use voxel_api_core::{
    ApiClient, Component, ComponentFilter, ComponentKind, EntityId, Range, Response, Result,
    Transport,
};

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Switch an entity's key on (or off with --off)
    TurnKey {
        entity: EntityId,
        #[arg(long)]
        off: bool,
    },
    /// Move an entity by a delta
    Move {
        entity: EntityId,
        #[arg(allow_negative_numbers = true)]
        dx: f32,
        #[arg(allow_negative_numbers = true)]
        dy: f32,
        #[arg(allow_negative_numbers = true)]
        dz: f32,
        /// Movement speed in units per second
        #[arg(long, default_value = "1.0")]
        speed: f32,
    },
    /// Move the player camera to a pose
    PlayerMove {
        /// Target position as x,y,z
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        position: [f32; 3],
        /// Look direction as x,y,z
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        rotation: [f32; 3],
        #[arg(long, default_value = "1.0")]
        speed: f32,
    },
    /// Release the engine window's input focus
    Unfocus,
    /// Add voxels given as x,y,z triples
    AddVoxels {
        #[arg(value_parser = parse_voxel, allow_hyphen_values = true)]
        voxels: Vec<[i32; 3]>,
        /// Replace the whole voxel set instead of adding to it
        #[arg(long)]
        replace: bool,
        /// Voxel edge length
        #[arg(long, default_value = "1.0")]
        size: f32,
    },
    /// Stage clearing a box, given as MIN,MAX per axis
    ClearVoxels {
        #[arg(short, value_parser = parse_range, allow_hyphen_values = true)]
        x: Range,
        #[arg(short, value_parser = parse_range, allow_hyphen_values = true)]
        y: Range,
        #[arg(short, value_parser = parse_range, allow_hyphen_values = true)]
        z: Range,
        /// Confirm the staged clear right away
        #[arg(long)]
        confirm: bool,
    },
    /// Confirm a pending action
    Confirm { action_id: i64 },
    /// List entities
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::Any)]
        filter: FilterArg,
    },
    /// Create an empty entity
    Create,
    /// Show one component of an entity
    Get { entity: EntityId, kind: KindArg },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterArg {
    Any,
    Positionable,
    Model,
}

impl From<FilterArg> for ComponentFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Any => ComponentFilter::Any,
            FilterArg::Positionable => ComponentFilter::Positionable,
            FilterArg::Model => ComponentFilter::Model,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Positionable,
    Model,
}

impl From<KindArg> for ComponentKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Positionable => ComponentKind::Positionable,
            KindArg::Model => ComponentKind::Model,
        }
    }
}

/// A command's result, as a human line and as JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub text: String,
    pub json: Value,
}

impl Output {
    fn response(response: Response) -> Self {
        Self {
            text: format!("ok (request {})", response.request_id),
            json: json!(response),
        }
    }
}

pub async fn run<T: Transport>(client: &mut ApiClient<T>, command: Command) -> Result<Output> {
    tracing::debug!("Running {:?}", command);

    let output = match command {
        Command::TurnKey { entity, off } => {
            Output::response(control::turn_key(client, entity, !off).await?)
        }
        Command::Move {
            entity,
            dx,
            dy,
            dz,
            speed,
        } => Output::response(control::move_entity(client, entity, [dx, dy, dz], speed).await?),
        Command::PlayerMove {
            position,
            rotation,
            speed,
        } => Output::response(control::player_move(client, position, rotation, speed).await?),
        Command::Unfocus => Output::response(control::unfocus_app(client).await?),
        Command::AddVoxels {
            voxels: coords,
            replace,
            size,
        } => Output::response(voxels::add_voxels(client, &coords, replace, size).await?),
        Command::ClearVoxels { x, y, z, confirm } => {
            let action_id = voxels::clear_voxels(client, x, y, z).await?;
            if confirm {
                voxels::confirm_action(client, action_id).await?;
                Output {
                    text: format!("Cleared (action {action_id})"),
                    json: json!({ "actionId": action_id, "confirmed": true }),
                }
            } else {
                Output {
                    text: format!("Staged clear as action {action_id}; run `confirm {action_id}` to apply"),
                    json: json!({ "actionId": action_id, "confirmed": false }),
                }
            }
        }
        Command::Confirm { action_id } => {
            Output::response(voxels::confirm_action(client, action_id).await?)
        }
        Command::List { filter } => {
            let listed = entities::list_entities(client, filter.into()).await?;
            let text = if listed.is_empty() {
                "No entities".to_string()
            } else {
                listed
                    .iter()
                    .map(|e| format!("{:>8}  {}", e.entity_id, e.describe_components()))
                    .collect::<Vec<_>>()
                    .join("\n")
            };
            Output {
                text,
                json: json!(listed),
            }
        }
        Command::Create => Output::response(entities::create_entity(client).await?),
        Command::Get { entity, kind } => {
            let kind = ComponentKind::from(kind);
            let component = entities::get_component(client, entity, kind).await?;
            let text = match &component {
                Some(Component::Positionable(p)) => format!(
                    "position {:?}  rotation {:?}  origin {:?}  scale {}",
                    p.position, p.rotation, p.origin, p.scale
                ),
                Some(Component::Model(m)) => format!("path {}", m.path),
                None => format!("Entity {} has no {}", entity, kind.label()),
            };
            Output {
                text,
                json: json!(component),
            }
        }
    };
    Ok(output)
}

fn parse_numbers<N: std::str::FromStr, const LEN: usize>(text: &str) -> std::result::Result<[N; LEN], String> {
    let parts: Vec<N> = text
        .split(',')
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| format!("`{part}` is not a number"))
        })
        .collect::<std::result::Result<_, _>>()?;

    let count = parts.len();
    parts
        .try_into()
        .map_err(|_| format!("expected {LEN} comma-separated values, got {count}"))
}

fn parse_vector(text: &str) -> std::result::Result<[f32; 3], String> {
    parse_numbers(text)
}

fn parse_voxel(text: &str) -> std::result::Result<[i32; 3], String> {
    parse_numbers(text)
}

fn parse_range(text: &str) -> std::result::Result<Range, String> {
    let [a, b] = parse_numbers::<f32, 2>(text)?;
    Ok(Range::spanning(a, b))
}
