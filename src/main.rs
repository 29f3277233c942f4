use clap::Parser;
use env_logger::Env;

use gridlock::simulation::{
    SimConfig, SimWorld, DEFAULT_BLOCK_LENGTH, DEFAULT_HEIGHT, DEFAULT_VEHICLES, DEFAULT_WIDTH,
};

#[derive(Parser)]
#[command(name = "gridlock")]
#[command(about = "Grid traffic simulation with traffic lights and greedy routing")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u64,

    /// Vehicles spawned at start
    #[arg(long, default_value_t = DEFAULT_VEHICLES)]
    vehicles: usize,

    /// Grid width in tiles
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: usize,

    /// Grid height in tiles
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: usize,

    /// Distance between parallel roads
    #[arg(long, default_value_t = DEFAULT_BLOCK_LENGTH)]
    block_length: usize,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Replace every arrived vehicle with a new one
    #[arg(long)]
    respawn: bool,

    /// Ticks between progress summaries (0 prints only the initial and final state)
    #[arg(long, default_value = "0")]
    print_every: u64,

    /// Skip drawing the map
    #[arg(long)]
    no_map: bool,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = SimConfig {
        width: cli.width,
        height: cli.height,
        block_length: cli.block_length,
        vehicles: cli.vehicles,
        respawn: cli.respawn,
        seed: cli.seed,
        ..SimConfig::default()
    };

    run_headless(SimWorld::new(config), &cli);
}

/// Run the simulation without graphics, printing progress to stdout
fn run_headless(mut world: SimWorld, cli: &Cli) {
    println!("Running grid traffic simulation for {} ticks", cli.ticks);
    println!();

    println!("Initial state:");
    show(&world, cli);

    for tick in 1..=cli.ticks {
        world.tick();

        if cli.print_every > 0 && tick % cli.print_every == 0 && tick < cli.ticks {
            println!("--- After tick {} ---", tick);
            show(&world, cli);
        }
    }

    println!("=== Final State ===");
    show(&world, cli);

    world.log_final_stats();
}

fn show(world: &SimWorld, cli: &Cli) {
    world.print_summary();
    if !cli.no_map {
        world.draw_map();
    }
    println!();
}
