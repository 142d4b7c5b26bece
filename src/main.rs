//! Demo driver: one session against the simulated grid.
//!
//! Ctrl-C is the return-to-menu interrupt; the session abandons the
//! in-flight turn and hands off to the menu destination.

use clap::Parser;
use colored::Colorize;
use std::time::Duration;
use tilematch::grid::SimGrid;
use tilematch::session::FlowConfig;
use tilematch::session::Session;
use tilematch::transition::ConsoleGateway;
use tokio::sync::mpsc::unbounded_channel;

#[derive(Debug, Parser)]
#[command(about = "Turn-driving core of a tile-matching puzzle game")]
struct Args {
    /// Moves granted to the player.
    #[arg(long, default_value_t = tilematch::DEFAULT_MOVES)]
    moves: tilematch::Moves,
    /// Seed for the simulated grid.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Animation beat of the simulated grid, in milliseconds.
    #[arg(long, default_value_t = 150)]
    beat_ms: u64,
    /// Log per-phase traces.
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tilematch::log(args.verbose);

    let grid = SimGrid::new(args.seed).with_beat(Duration::from_millis(args.beat_ms));
    let config = FlowConfig {
        moves: args.moves,
        ..FlowConfig::default()
    };
    let mut session = Session::new(grid, ConsoleGateway, config);

    let interrupt = session.interrupter();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.expect("listen for ctrl-c");
        log::info!("ctrl-c received, returning to menu");
        interrupt.cancel();
    });

    let (scores, mut changes) = unbounded_channel();
    session.observe(scores);
    tokio::spawn(async move {
        while let Some(change) = changes.recv().await {
            println!("{} {}", "score".green().bold(), change);
        }
    });

    let summary = session.run().await?;
    println!("{}", summary.to_json());
    Ok(())
}
