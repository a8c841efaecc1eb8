use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use instant::Instant;

use rollersim::{logging, roster, SimConfig, SimulationContext};

/// Longest real frame fed to one tick (prevents spiral of death).
const MAX_ACCUMULATOR: f64 = 0.25;
/// How often to emit a housekeeping snapshot (simulated seconds).
const HOUSEKEEPING_INTERVAL: f32 = 1.0;
/// Seconds between the player's drive reversals.
const DRIVE_SWITCH_PERIOD: f32 = 2.0;
const TERRAIN_WIDTH: u32 = 1600;
const TERRAIN_HEIGHT: u32 = 900;

/// Headless sphere-bot simulation over the demo map
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with simulation parameters
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f32,
    /// RNG seed, overrides the config file
    #[arg(long)]
    seed: Option<u64>,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<SimConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args)?;
    let tick_period = 1.0 / f64::from(config.tick_rate);
    let terrain = roster::demo_terrain(TERRAIN_WIDTH, TERRAIN_HEIGHT);
    let mut sim = SimulationContext::new(config, terrain)?;
    let cast = roster::spawn_demo(&mut sim)?;

    let mut accumulator = 0.0;
    let mut last_frame = Instant::now();
    let mut next_housekeeping = HOUSEKEEPING_INTERVAL;

    while sim.elapsed() < args.seconds {
        let now = Instant::now();
        accumulator += now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        if accumulator < tick_period {
            std::thread::sleep(Duration::from_secs_f64(tick_period - accumulator));
            continue;
        }
        // One physics step per frame, fed the real frame time.
        let dt = accumulator.min(MAX_ACCUMULATOR) as f32;
        accumulator = 0.0;

        let phase = (sim.elapsed() / DRIVE_SWITCH_PERIOD) as u32;
        let axis = if phase % 2 == 0 { 1.0 } else { -1.0 };
        sim.set_drive(cast.player, axis)?;
        sim.tick(dt);

        if sim.elapsed() >= next_housekeeping {
            next_housekeeping += HOUSEKEEPING_INTERVAL;
            log::debug!("{}", serde_json::to_string(&sim.housekeeping())?);
            log::debug!("Systems: {}", sim.timers());
        }
    }

    log::info!(
        "Finished {} ticks in {:.1} simulated seconds",
        sim.ticks(),
        sim.elapsed()
    );
    Ok(())
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);
    log::info!("rollersim starting up");

    if let Err(e) = run(&args) {
        log::error!("Fatal error: {e}");
        std::process::exit(1);
    }
}
