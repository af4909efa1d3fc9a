mod config;
mod event_log;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;

use config::Config;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Play a FiveTwelve session headlessly and report the result"
)]
struct Cli {
    /// Session configuration (TOML); defaults apply when omitted
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Seed for tile spawns (overrides grid.seed)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Do not print the final board
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut config = match &cli.config {
        Some(path) => {
            info!("Using configuration file: {}", path.display());
            Config::from_toml(path)?
        }
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config.grid.seed = Some(seed);
    }

    let summary = session::run_session(&config)?;
    if !cli.quiet {
        println!("{}", summary.grid);
    }
    info!(
        "Completed session: {} moves, score {}, highest tile {}{}",
        summary.moves,
        summary.score,
        summary.highest_tile,
        if summary.game_over { " (game over)" } else { "" }
    );
    info!(
        "Events: {} created, {} updated, {} removed",
        summary.events.created, summary.events.updated, summary.events.removed
    );
    Ok(())
}
