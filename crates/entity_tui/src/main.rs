//! Terminal editor for the entities of a running voxel engine.

mod app;
mod edit;
mod input;
mod listing;
mod logging;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use voxel_api_core::{ApiClient, ApiConfig, ZmqTransport};

use crate::app::App;
use crate::input::Key;

#[derive(Parser, Debug)]
#[command(name = "entity_tui")]
#[command(about = "Browse and edit entity components in a running engine")]
struct Args {
    /// Engine API endpoint [default: $VOXEL_API_ADDRESS or tcp://127.0.0.1:4455]
    #[arg(short, long)]
    address: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init()?;

    let config = ApiConfig::resolve(args.address);
    tracing::info!("Connecting to {}", config.endpoint);
    let client = ApiClient::connect(&config)
        .await
        .with_context(|| format!("failed to connect to {}", config.endpoint))?;

    let mut app = App::new(client);
    app.load()
        .await
        .with_context(|| format!("failed to load entities from {}", config.endpoint))?;

    let mut terminal = ratatui::try_init().context("failed to set up the terminal")?;
    let result = run(&mut terminal, &mut app).await;
    ratatui::restore();

    if let Err(e) = app.close().await {
        tracing::warn!("Error closing connection: {}", e);
    }
    result
}

async fn run(terminal: &mut DefaultTerminal, app: &mut App<ZmqTransport>) -> Result<()> {
    let mut events = EventStream::new();

    while !app.should_quit() {
        terminal.draw(|frame| ui::render(frame, app))?;

        let Some(event) = events.next().await else {
            break;
        };
        if let Event::Key(event) = event? {
            if let Some(key) = Key::from_event(event) {
                app.handle_key(key).await?;
            }
        }
    }
    Ok(())
}
