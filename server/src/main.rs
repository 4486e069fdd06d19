use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{info, warn};

use common::session::Session;
use server::{
    build_app,
    config::{init_tracing, load_level, loop_frequency, tick_duration},
    constants::{DEFAULT_PLAYER_NAME, SERVER_LOOP_FREQUENCY},
};

// ============================================================================
// CLI Argument Parsing
// ============================================================================

#[derive(Parser)]
#[command(author, version, about = "Guardian patrol simulation", long_about = None)]
struct Args {
    // Level file (JSON)
    #[arg(short, long)]
    level: PathBuf,

    // Simulation ticks per second
    #[arg(long, default_value_t = SERVER_LOOP_FREQUENCY)]
    hz: u64,

    // Stop after this many simulated seconds
    #[arg(short, long)]
    duration: Option<f32>,

    // Run ticks back to back instead of in real time
    #[arg(long, default_value_t = false)]
    fast: bool,

    // Player name recorded with the outcome
    #[arg(short, long, default_value = DEFAULT_PLAYER_NAME)]
    player: String,
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let level = load_level(&args.level)?;
    info!(
        "loaded {}: {} nav nodes, {} zones, {} guardians, {} script events",
        args.level.display(),
        level.terrain.graph.len(),
        level.terrain.zones.len(),
        level.guardians.len(),
        level.script.len()
    );

    let hz = loop_frequency(args.hz);
    if hz != args.hz {
        warn!("--hz {} out of range, using {hz}", args.hz);
    }
    let tick_duration = tick_duration(hz);
    let max_frames = args.duration.map(|secs| (secs.max(0.0) * hz as f32).ceil() as u64);

    let mut app = build_app(level, &args.player, tick_duration);

    info!("starting simulation at {hz} Hz...");

    let mut interval = time::interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut frame: u64 = 0;
    loop {
        if !args.fast {
            interval.tick().await;
        }

        let update_start = Instant::now();
        app.update();
        let update_elapsed = update_start.elapsed();

        if !args.fast && update_elapsed > tick_duration {
            warn!(
                "tick {} took {:.2}ms (exceeded {:.2}ms budget)",
                frame,
                update_elapsed.as_secs_f64() * 1000.0,
                tick_duration.as_secs_f64() * 1000.0
            );
        }

        frame += 1;

        if app.world().resource::<Session>().is_over() {
            break;
        }
        if max_frames.is_some_and(|max| frame >= max) {
            break;
        }
    }

    let session = app.world().resource::<Session>();
    match session.outcome() {
        Some(outcome) => info!(
            "run over after {frame} ticks: {} ({:.2}s, player {})",
            outcome,
            session.elapsed(),
            session.player_name()
        ),
        None => info!("stopped after {frame} ticks ({:.2}s) without an outcome", session.elapsed()),
    }

    Ok(())
}
