use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

mod config;
mod engine;
mod replay;

use config::Config;

#[derive(Parser)]
#[command(name = "gatekeeper", about = "Face access control and gesture pipeline")]
struct Cli {
    /// TOML configuration file (GATEKEEPER_* variables override it)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay recorded frame observations and print one JSON report per frame
    Replay {
        /// JSON-lines inputs, one per frame source ("-" for stdin)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Show the loaded allowed and denied galleries
    Gallery,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    tracing::debug!(?config, "configuration loaded");

    let handle = engine::start(&config)?;

    match cli.command {
        Commands::Replay { inputs } => {
            let (tx, mut rx) = mpsc::channel::<engine::FrameResult>(config.queue_depth.max(1));

            let mut sources = JoinSet::new();
            for input in inputs {
                let handle = handle.clone();
                let tx = tx.clone();
                sources.spawn(async move { replay::replay_path(handle, &input, tx).await });
            }
            drop(tx);

            let printer = tokio::spawn(async move {
                let stdout = std::io::stdout();
                while let Some(result) = rx.recv().await {
                    let mut out = stdout.lock();
                    serde_json::to_writer(&mut out, &result)?;
                    writeln!(out)?;
                }
                anyhow::Ok(())
            });

            let mut total = 0;
            while let Some(joined) = sources.join_next().await {
                total += joined??;
            }
            printer.await??;
            tracing::info!(frames = total, "replay complete");
        }
        Commands::Gallery => {
            let summary = handle.gallery().await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
