//! Fetch the upstream data once and save it as a demo snapshot.
//!
//! The snapshot lets the server run offline with `--snapshot <path>`.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use windfield::config::Args as ServerArgs;
use windfield::data_loader::save_snapshot;
use windfield::fetch::UpstreamClient;
use windfield::{init_tracing, Config};

#[derive(Parser, Debug)]
#[command(name = "fetch_demo")]
#[command(author, version, about = "Save a demo snapshot of the upstream data", long_about = None)]
struct Args {
    /// Where to write the snapshot
    #[arg(short, long, default_value = "demo-data.json")]
    output: PathBuf,

    /// JSON configuration file with grid and endpoint settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_args(ServerArgs {
        config: args.config.clone(),
        ..Default::default()
    })
    .context("loading configuration")?;
    config.validate().context("validating configuration")?;
    init_tracing(&config.log_level);

    let grid = config.grid.fetch_grid();
    println!("Fetching {} grid points...", grid.len());

    let client = UpstreamClient::from_config(&config.data)?;
    let snapshot = client
        .fetch_snapshot(grid)
        .await
        .context("fetching upstream data")?;

    let bytes = save_snapshot(&args.output, &snapshot)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!(
        "Saved {} points to {} ({:.1} MB)",
        snapshot.grid.len(),
        args.output.display(),
        bytes as f64 / 1024.0 / 1024.0
    );
    Ok(())
}
