//! One-shot calls against a running voxel engine, for scripts and shells.

mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use voxel_api_core::{ApiClient, ApiConfig};

use crate::commands::Command;

#[derive(Parser, Debug)]
#[command(name = "voxel_ctl")]
#[command(about = "Send a single request to the voxel engine API")]
struct Args {
    /// Engine API endpoint [default: $VOXEL_API_ADDRESS or tcp://127.0.0.1:4455]
    #[arg(short, long, global = true)]
    address: Option<String>,

    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ApiConfig::resolve(args.address);

    let mut client = ApiClient::connect(&config)
        .await
        .with_context(|| format!("failed to connect to {}", config.endpoint))?;

    let result = commands::run(&mut client, args.command).await;
    if let Err(e) = client.close().await {
        tracing::warn!("Error closing connection: {}", e);
    }
    let output = result?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output.json)?);
    } else {
        println!("{}", output.text);
    }
    Ok(())
}
