use anyhow::{bail, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use grid_traffic::simulation::{self, SimWorld, VehicleState, DEFAULT_TICK_RATE};

#[derive(Parser)]
#[command(name = "grid_traffic")]
#[command(about = "Headless grid traffic simulation with a fuel-spot economy")]
struct Cli {
    /// Map file to load
    #[arg(long, default_value = "maps/map.txt")]
    map: PathBuf,

    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u32,

    /// Number of vehicles to add before starting
    #[arg(long, default_value = "5")]
    vehicles: usize,

    /// Ticks per second of simulated time
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    tick_rate: u32,

    /// Seed for reproducible trips
    #[arg(long)]
    seed: Option<u64>,

    /// Print a summary every N ticks
    #[arg(long, default_value = "250")]
    report_every: u32,

    /// Skip drawing the map in reports
    #[arg(long)]
    quiet_map: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.report_every == 0 {
        bail!("--report-every must be at least 1");
    }

    let grid = simulation::load_map(&cli.map)?;
    let mut world = match cli.seed {
        Some(seed) => SimWorld::new_with_seed(grid, seed),
        None => SimWorld::new(grid),
    };
    let tick_rate = world.set_tick_rate(cli.tick_rate);

    for _ in 0..cli.vehicles {
        world.add_vehicle();
    }

    run_headless(&mut world, &cli);

    info!("Ran {} ticks at {} ticks/s", cli.ticks, tick_rate);
    Ok(())
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(world: &mut SimWorld, cli: &Cli) {
    info!(
        "Running grid traffic simulation: {} vehicles, {} ticks",
        world.vehicles().len(),
        cli.ticks
    );

    println!("Initial state:");
    world.print_summary();
    if !cli.quiet_map {
        world.draw_map();
    }
    println!();

    let mut tick = 0;
    while tick < cli.ticks {
        let ticks_to_run = cli.report_every.min(cli.ticks - tick);

        for _ in 0..ticks_to_run {
            tick += 1;
            world.tick();
        }

        println!("--- After tick {} ({:.1}s simulated time) ---", tick, world.time);
        world.print_summary();
        if !cli.quiet_map {
            world.draw_map();
        }
        println!();
    }

    let stalled = world
        .vehicles()
        .iter()
        .filter(|vehicle| vehicle.state() == VehicleState::Stalled)
        .count();

    info!("=== SIMULATION COMPLETE ===");
    info!("Total ticks: {}", world.ticks());
    info!("Vehicles: {}", world.vehicles().len());
    info!("Trips assigned: {}", world.routes_assigned());
    info!("Trips completed: {}", world.economy().arrivals);
    info!("Routes not found: {}", world.routing_failures());
    info!("Fuel spots consumed: {}", world.economy().spots_consumed);
    info!("Fuel spots available: {}", world.economy().allowance);
    info!("Stalled vehicles: {}", stalled);
}
