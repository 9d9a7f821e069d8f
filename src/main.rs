use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;
use rand::Rng;
use snake_arena::config::{GridSize, SessionConfig, load_config, load_config_from_path};
use snake_arena::{Arena, Direction, Moves, TickReport};

/// Runs a headless arena session with randomly moving agents.
#[derive(Debug, Parser)]
#[command(name = "snake-arena", version)]
struct Cli {
    /// JSON configuration file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of agents.
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// Number of food items kept on the grid.
    #[arg(short = 'f', long)]
    food: Option<usize>,

    /// Grid rows.
    #[arg(long)]
    rows: Option<u16>,

    /// Grid columns.
    #[arg(long)]
    cols: Option<u16>,

    /// Maximum number of ticks to run.
    #[arg(short = 't', long, default_value_t = 100)]
    ticks: u64,

    /// Random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Request dead-body-to-food conversion (accepted, not implemented).
    #[arg(long = "dead-to-food")]
    dead_to_food: bool,

    /// Print the final report as JSON instead of a text grid.
    #[arg(long)]
    json: bool,

    /// Print the effective configuration and exit.
    #[arg(long = "print-config")]
    print_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = resolve_config(&cli)?;
    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let seed = config.seed.unwrap_or_else(rand::random);
    info!("starting session with seed {seed}");
    let mut arena = Arena::with_seed(config, seed)?;

    let mut last_report: Option<TickReport> = None;
    while arena.tick_count() < cli.ticks && arena.alive_count() > 0 {
        let moves = random_moves(&mut arena);
        let report = arena.step(&moves)?;
        for death in &report.deaths {
            info!("tick {}: agent {} {}", report.tick, death.uid, death.cause);
        }
        last_report = Some(report);
    }

    let Some(report) = last_report else {
        println!("{}", arena.grid().snapshot());
        return Ok(());
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "tick {}: {} of {} agents alive, status {:?}",
            report.tick,
            report.alive_count(),
            arena.num_agents(),
            report.status_flags()
        );
        print!("{}", report.grid);
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<SessionConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path)?,
        None => load_config()?,
    };

    if let Some(agents) = cli.agents {
        config.num_agents = agents;
    }
    if let Some(food) = cli.food {
        config.num_food = food;
    }
    if cli.rows.is_some() || cli.cols.is_some() {
        config.grid_size = GridSize::new(
            cli.rows.unwrap_or(config.grid_size.rows),
            cli.cols.unwrap_or(config.grid_size.cols),
        );
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.dead_to_food {
        config.dead_to_food = true;
    }

    config.validate()?;
    Ok(config)
}

/// Picks a random direction for every live agent, never straight back into its neck.
fn random_moves(arena: &mut Arena) -> Moves {
    let mut moves = arena.empty_moves();
    let plans: Vec<_> = arena
        .snakes()
        .iter()
        .filter(|snake| snake.is_alive())
        .map(|snake| {
            let neck = snake.segments().nth(1).copied();
            let head = snake.head().ok();
            (snake.id(), head, neck)
        })
        .collect();

    for (uid, head, neck) in plans {
        let options: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|direction| match (head, neck) {
                (Some(head), Some(neck)) => head.step(*direction) != neck,
                _ => true,
            })
            .collect();
        let index = arena.rng_mut().gen_range(0..options.len());
        moves.set(uid, options[index]);
    }
    moves
}
