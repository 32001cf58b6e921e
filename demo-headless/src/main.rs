use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tree_fire_core::{
    FireParameters, KernelBackend, ObjectRegistry, ObjectState, Scheduler, SimulationConfig,
    TileGeometry, TileSource, TreeRecord, Vec2,
};

/// Headless tree fire simulation driver
#[derive(Parser, Debug)]
#[command(name = "tree-fire-demo")]
#[command(about = "Spreads fire across tiled forests without a renderer", long_about = None)]
struct Args {
    /// Simulated duration in seconds
    #[arg(short, long, default_value_t = 30.0)]
    duration: f32,

    /// Tiles per side (the world is a square of tiles)
    #[arg(long, default_value_t = 2)]
    tiles: usize,

    /// World size of each tile
    #[arg(long, default_value_t = 500.0)]
    tile_size: f32,

    /// Grid resolution per tile (multiple of 8)
    #[arg(short, long, default_value_t = 256)]
    resolution: usize,

    /// Trees scattered per tile
    #[arg(short = 'n', long, default_value_t = 4000)]
    trees: usize,

    /// Trees set on fire per tile at the start
    #[arg(short, long, default_value_t = 5)]
    ignite: usize,

    /// Wind direction in degrees (0=North, 90=East)
    #[arg(long, default_value_t = 45.0)]
    wind_direction: f32,

    /// Wind speed
    #[arg(short, long, default_value_t = 5.0)]
    wind_speed: f32,

    /// Natural spread rate in percent per step
    #[arg(long, default_value_t = 45.0)]
    spread: f32,

    /// Seconds between grid steps
    #[arg(long, default_value_t = 0.5)]
    step_interval: f32,

    /// Longest tick handed to the registry
    #[arg(long, default_value_t = 0.1)]
    max_tick: f32,

    /// Report interval in seconds
    #[arg(short = 'p', long, default_value_t = 2.0)]
    report_interval: f32,

    /// Random seed for tree placement, ignition and spread
    #[arg(short, long, default_value_t = 15)]
    seed: u64,

    /// Use the single-threaded kernel
    #[arg(long)]
    sequential: bool,

    /// Restore every tile to its initial trees before exiting
    #[arg(long)]
    cleanup: bool,
}

fn scatter(count: usize, rng: &mut StdRng) -> Vec<TreeRecord> {
    (0..count)
        .map(|_| {
            TreeRecord::new(
                Vec2::new(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)),
                0,
            )
        })
        .collect()
}

fn tally(registry: &ObjectRegistry) -> (usize, usize, usize) {
    registry.tiles().iter().fold((0, 0, 0), |(alive, burning, dead), tile| {
        (
            alive + tile.count(ObjectState::Alive),
            burning + tile.count(ObjectState::Burning),
            dead + tile.count(ObjectState::Dead),
        )
    })
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    println!("=== Tree Fire Simulation Demo ===\n");

    let config = SimulationConfig {
        fire: FireParameters {
            wind_direction: args.wind_direction,
            wind_speed: args.wind_speed,
            natural_spread: args.spread,
            step_interval: args.step_interval,
        },
        kernel: if args.sequential {
            KernelBackend::Sequential
        } else {
            KernelBackend::Parallel
        },
        seed: Some(args.seed),
        ..SimulationConfig::default()
    };

    let mut registry = match ObjectRegistry::new(config) {
        Ok(registry) => registry,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    let mut rng = StdRng::seed_from_u64(args.seed);
    for row in 0..args.tiles {
        for col in 0..args.tiles {
            let origin = Vec2::new(col as f32 * args.tile_size, row as f32 * args.tile_size);
            let geometry = TileGeometry::square(origin, args.tile_size, args.resolution);
            let source = TileSource::new(geometry, scatter(args.trees, &mut rng));
            if let Err(err) = registry.add_tile(source) {
                eprintln!("Cannot prepare tile at ({:.0}, {:.0}): {err}", origin.x, origin.y);
                std::process::exit(2);
            }
        }
    }
    println!(
        "Prepared {} tiles of {:.0}x{:.0} with {} trees each ({}x{} grid)",
        registry.tile_count(),
        args.tile_size,
        args.tile_size,
        args.trees,
        args.resolution,
        args.resolution
    );

    let ignited = registry.ignite_random_trees(args.ignite, args.seed);
    println!("Ignited {ignited} trees\n");
    registry.start_all();

    let mut scheduler = match Scheduler::new(args.max_tick) {
        Ok(scheduler) => scheduler,
        Err(err) => {
            eprintln!("Invalid max tick: {err}");
            std::process::exit(2);
        }
    };

    println!("Time(s) | Steps | Cells Ignited | Alive | Burning | Dead");
    println!("--------|-------|---------------|-------|---------|------");

    let report_interval = args.report_interval.max(args.max_tick);
    let mut time = 0.0;
    while time < args.duration {
        let slice = report_interval.min(args.duration - time);
        scheduler.advance(&mut registry, slice);
        time += slice;

        let totals = scheduler.totals();
        let (alive, burning, dead) = tally(&registry);
        println!(
            "{:7.1} | {:5} | {:13} | {:5} | {:7} | {:4}",
            time, totals.steps, totals.ignitions, alive, burning, dead
        );

        if burning == 0 && totals.steps > 0 {
            info!("No trees left burning at {:.1}s", time);
            break;
        }
    }

    let totals = scheduler.totals();
    println!("\n=== Simulation Complete ===");
    println!("Simulated time: {:.1}s", scheduler.elapsed());
    println!("Grid steps: {}", totals.steps);
    println!("Cells ignited: {}, burnt out: {}", totals.ignitions, totals.burnouts);
    println!(
        "Trees ignited: {}, burnt out: {}",
        totals.objects_ignited, totals.objects_burnt_out
    );

    if args.cleanup {
        registry.cleanup();
        let (alive, burning, dead) = tally(&registry);
        println!("\nRestored initial trees: {alive} alive, {burning} burning, {dead} dead");
    }
}
