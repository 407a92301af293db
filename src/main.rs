use clap::Parser;
use crobots::config;
use crobots::engine::{Engine, EngineOptions};
use crobots::game::{Game, GameSettings};
use crobots::logging;
use crobots::robots::register_builtins;
use crobots::{Arena, Loader};
use log::{error, info, warn};
use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Robots to load (1 to 4): built-in names or shared libraries in --robot-dir.
    /// The first robot is required; later ones that fail to load are skipped.
    #[arg(required = true, num_args = 1..=config::MAX_ROBOTS)]
    robots: Vec<String>,

    /// Arena width.
    #[arg(long, default_value_t = config::DEFAULT_ARENA_WIDTH)]
    width: u32,

    /// Arena height.
    #[arg(long, default_value_t = config::DEFAULT_ARENA_HEIGHT)]
    height: u32,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = config::DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Seed for placement and robot random numbers (random if omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// Robots take no damage.
    #[arg(long)]
    no_damage: bool,

    /// Keep spawn points this far from the walls.
    #[arg(long, default_value_t = config::DEFAULT_PLACEMENT_MARGIN)]
    margin: u32,

    /// Directory searched for robot libraries.
    #[arg(long, default_value = ".")]
    robot_dir: PathBuf,

    /// Minimum milliseconds per tick.
    #[arg(long, default_value_t = config::DEFAULT_TICK_MS)]
    tick_ms: u64,

    /// Wait for Enter after every tick in which a scan found something.
    #[arg(long)]
    pause_on_scan: bool,

    /// Log robot status every N ticks (0 disables).
    #[arg(long, default_value_t = 0)]
    status_every: u64,

    /// Debug filter to specify log topics (e.g., "engine,drive,scan")
    /// Available topics: engine, robot, drive, scan, weapon, loader
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Also write log lines to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let log_file = args.log_file.as_ref().map(File::create).transpose()?;
    if let Err(e) = logging::init_logger(logging::parse_level(&args.log_level), args.debug_filter.clone(), log_file) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    info!("Initializing Crobots...");
    let arena = Arena::new(args.width, args.height)?;

    let mut loader = Loader::new(arena).with_search_dir(args.robot_dir.clone());
    register_builtins(&mut loader);
    for (index, name) in args.robots.iter().enumerate() {
        let id = index as u32 + 1;
        if let Err(e) = loader.load(name, id) {
            if index == 0 {
                error!("First robot is required, giving up");
                return Err(e.into());
            }
            warn!("Skipping robot '{}'", name);
        }
    }

    let mut engine = Engine::new(
        arena,
        EngineOptions {
            indestructible: args.no_damage,
            placement_margin: args.margin,
            seed: args.seed,
            ..EngineOptions::default()
        },
    );
    engine.load(loader.into_robots())?;

    let mut game = Game::new(
        engine,
        GameSettings {
            max_ticks: args.max_ticks,
            tick_duration: Duration::from_millis(args.tick_ms),
            pause_on_scan: args.pause_on_scan,
            status_every: args.status_every,
        },
    );
    game.run();
    info!("Exiting Crobots.");
    Ok(())
}
