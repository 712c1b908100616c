//! Command line host for the Carcassonne rules engine.

use anyhow::Context;
use carcassonne_core::GameRecord;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod session;

use session::Session;

/// Upper bound on actions in one autoplayed game
const MAX_ACTIONS: usize = 1000;

#[derive(Parser)]
#[command(name = "carcassonne-cli")]
#[command(about = "Play and replay Carcassonne games")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a game by always taking the first legal action
    Autoplay {
        /// Teams in turn order, comma separated
        #[arg(long, value_delimiter = ',', default_value = "A,B")]
        teams: Vec<String>,

        /// Seed for the deck shuffle
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Write the game record to this file
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Replay a recorded game and print how it ended
    Replay {
        /// Game record written by `autoplay --record`
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let session = match args.command {
        Command::Autoplay {
            teams,
            seed,
            record,
        } => {
            let mut session = Session::new(teams, seed)?;
            session.play_out(MAX_ACTIONS)?;

            if let Some(path) = record {
                let json = session.record().to_json()?;
                std::fs::write(&path, json)
                    .with_context(|| format!("writing record to {}", path.display()))?;
                info!(path = %path.display(), "record written");
            }
            session
        }
        Command::Replay { path } => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading record from {}", path.display()))?;
            let record = GameRecord::from_json(&json)
                .with_context(|| format!("parsing record {}", path.display()))?;
            Session::replay(&record)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&session.report())?);
    Ok(())
}
