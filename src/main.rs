use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::Rng;

use engine::{prelude::*, Config, FOV_RADIUS};

mod input;
mod mapgen;
mod run;
mod view;

pub const GAME_NAME: &str = "samsara";

#[derive(Parser, Debug)]
#[command(name = GAME_NAME, about = "Turn-based dungeon crawl")]
struct Args {
    /// Game seed, a random one is picked if not given.
    #[arg(long)]
    seed: Option<String>,

    /// Level width.
    #[arg(long, default_value_t = 80)]
    width: i32,

    /// Level height.
    #[arg(long, default_value_t = 50)]
    height: i32,

    /// How many times to try placing a room.
    #[arg(long, default_value_t = 40)]
    rooms: usize,

    /// Load the level from an ASCII map file instead of generating one.
    #[arg(long)]
    map: Option<PathBuf>,

    /// How far the player can see.
    #[arg(long, default_value_t = FOV_RADIUS)]
    radius: i32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let args = Args::parse();

    let seed = args
        .seed
        .unwrap_or_else(|| format!("{:08X}", rand::rng().random::<u32>()));
    log::info!("seed: {seed}");
    let mut rng = util::srng(&seed);

    let level = match &args.map {
        Some(path) => {
            let text = std::fs::read_to_string(path).with_context(|| {
                format!("failed to read map {}", path.display())
            })?;
            Level::from_ascii(&text)
                .with_context(|| format!("bad map {}", path.display()))?
        }
        None => mapgen::SimpleLevelBuilder::new(
            args.width,
            args.height,
            args.rooms,
        )
        .build(&mut rng)?,
    };

    let config = Config {
        player_view_radius: args.radius,
        ..Default::default()
    };
    let r = Runtime::new(level, rng, config)?;

    println!("{GAME_NAME} -- seed {seed}");
    run::run(r)
}
