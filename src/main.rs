/*
 * Dudes and Trees
 *
 * Click on the board to drop a box. Good guys (blue) and bad guys (red) race
 * for the nearest live box; a good-guy capture scores a point, a bad-guy
 * capture only denies it. Clicking on a guy removes him: +1 for a bad guy,
 * -1 for a good one. Boxes dropped in water or next to a tree stay inert.
 */

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dudes_and_trees::{app, logging, GameParams};

/// A capture-the-box game over procedural terrain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with game parameters; missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the terrain and the simulation
    #[arg(short, long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let params = match launch_params(&args) {
        Ok(params) => params,
        Err(err) => {
            log::error!("{err:#}");
            return ExitCode::FAILURE;
        }
    };

    app::run(params);
    ExitCode::SUCCESS
}

fn launch_params(args: &Args) -> anyhow::Result<GameParams> {
    let mut params = match &args.config {
        Some(path) => GameParams::load(path).context("cannot start without valid parameters")?,
        None => GameParams::default(),
    };
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    Ok(params)
}
