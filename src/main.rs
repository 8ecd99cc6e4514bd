use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;

use junction_sim::simulation::{
    FixedStepper, Settings, SettingsPatch, SimWorld, FIXED_STEP_MS,
};
use junction_sim::storage;

#[derive(Parser)]
#[command(name = "junction_sim")]
#[command(about = "Four-way junction traffic simulation with a terminal map")]
struct Cli {
    /// Number of fixed 100 ms simulation steps to run in batch mode
    #[arg(long, default_value = "600")]
    ticks: u64,

    /// Seed for deterministic spawning and speed assignment
    #[arg(long)]
    seed: Option<u64>,

    /// Vehicles per minute across all lanes [10-120]
    #[arg(long)]
    spawn_rate: Option<f32>,

    /// Cruising speed scale [0.5-2]
    #[arg(long)]
    speed_multiplier: Option<f32>,

    /// Signal behavior: auto, blink or off
    #[arg(long)]
    signal_mode: Option<String>,

    /// Fraction of nominal spawn capacity [0.2-1]
    #[arg(long)]
    lane_density: Option<f32>,

    /// Directory holding the persisted settings document
    #[arg(long)]
    settings_dir: Option<PathBuf>,

    /// Drive the simulation from wall-clock time instead of running
    /// ticks back-to-back
    #[arg(long)]
    realtime: bool,

    /// Wall-clock seconds to run in realtime mode
    #[arg(long, default_value = "30")]
    duration_secs: u64,

    /// Draw the map every N simulated seconds (0 disables map output)
    #[arg(long, default_value = "5")]
    map_every: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Persisted settings first, CLI overrides on top, everything through
    // the normalizer.
    let base = cli
        .settings_dir
        .as_deref()
        .and_then(storage::load_settings)
        .unwrap_or_default();

    let settings = base.with_patch(SettingsPatch {
        spawn_rate_per_min: cli.spawn_rate,
        speed_multiplier: cli.speed_multiplier,
        signal_mode: cli.signal_mode.clone(),
        lane_density: cli.lane_density,
    });

    if let Some(dir) = &cli.settings_dir {
        storage::save_settings(dir, &settings)?;
    }

    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(seed),
        None => SimWorld::new(),
    };

    println!("Junction traffic simulation");
    println!(
        "Settings: {} vehicles/min, speed x{}, signals {}, density {}",
        settings.spawn_rate_per_min,
        settings.speed_multiplier,
        settings.signal_mode,
        settings.lane_density
    );
    println!();

    if cli.realtime {
        run_realtime(&mut world, &settings, cli.duration_secs, cli.map_every);
    } else {
        run_batch(&mut world, &settings, cli.ticks, cli.map_every);
    }

    Ok(())
}

/// Run a fixed number of ticks back-to-back, reporting once per
/// simulated second
fn run_batch(world: &mut SimWorld, settings: &Settings, ticks: u64, map_every: u64) {
    let ticks_per_second = (1000 / FIXED_STEP_MS) as u64;

    let mut tick = 0;
    while tick < ticks {
        let burst = ticks_per_second.min(ticks - tick);
        for _ in 0..burst {
            world.step(settings, FIXED_STEP_MS);
            tick += 1;
        }

        println!(
            "--- After tick {} ({:.1}s simulated) ---",
            tick,
            world.time_ms as f32 / 1000.0
        );
        world.print_summary();
        if map_every > 0 && world.time_ms % (map_every * 1000) == 0 {
            world.draw_map();
        }
        println!();
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();
}

/// Drive the simulation from wall-clock time through the fixed-step
/// accumulator, the way an animation-frame loop would
fn run_realtime(world: &mut SimWorld, settings: &Settings, duration_secs: u64, map_every: u64) {
    let mut stepper = FixedStepper::new();
    let started = Instant::now();
    let mut last_frame = started;
    let mut last_report_s = 0;

    while started.elapsed() < Duration::from_secs(duration_secs) {
        let now = Instant::now();
        let elapsed_ms = now.duration_since(last_frame).as_millis() as u64;
        last_frame = now;

        for _ in 0..stepper.advance(elapsed_ms) {
            world.step(settings, FIXED_STEP_MS);
        }

        let sim_seconds = world.time_ms / 1000;
        if sim_seconds > last_report_s {
            last_report_s = sim_seconds;
            println!("--- {}s simulated ---", sim_seconds);
            world.print_summary();
            if map_every > 0 && sim_seconds % map_every == 0 {
                world.draw_map();
            }
            println!();
        }

        std::thread::sleep(Duration::from_millis(16));
    }

    println!("=== Final State ===");
    world.print_summary();
    world.draw_map();
}
