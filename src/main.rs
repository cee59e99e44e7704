//! Marga - run one planning scenario from a TOML file
//!
//! Loads the scenario (or a previously saved grid), plans from start to end
//! and prints the resulting maps.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use marga::{
    AnsiRenderer, Format, GridSnapshot, OccupancyGrid, Planner, RenderView, Result,
    ScenarioConfig, SearchAlgorithm, SearchOutcome, load_grid, save_grid,
};

#[derive(Parser, Debug)]
#[command(name = "marga")]
#[command(about = "Plan a collision-free path for a disc robot on an occupancy grid")]
struct Args {
    /// Scenario file (TOML)
    scenario: PathBuf,

    /// Override the scenario's search algorithm
    #[arg(short, long, value_enum)]
    algorithm: Option<SearchAlgorithm>,

    /// Print a snapshot after every robot move
    #[arg(short, long)]
    visualize: bool,

    /// Save the planned grid to this file
    #[arg(long)]
    save: Option<PathBuf>,

    /// Plan on a saved grid instead of building one from the scenario
    #[arg(long)]
    load: Option<PathBuf>,

    /// Read and write the headerless legacy grid format
    #[arg(long)]
    legacy: bool,

    /// Disable ANSI colors
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("marga=info")),
        )
        .init();

    let args = Args::parse();
    let format = if args.legacy {
        Format::Legacy
    } else {
        Format::Native
    };

    info!("Marga v{}", env!("CARGO_PKG_VERSION"));
    info!("Loading scenario from {:?}", args.scenario);
    let mut scenario = ScenarioConfig::load(&args.scenario)?;
    if let Some(algorithm) = args.algorithm {
        scenario.search.algorithm = algorithm;
    }
    let visualize = args.visualize || scenario.search.visualize;

    let mut grid: OccupancyGrid = match &args.load {
        Some(path) => {
            info!("Loading grid from {:?} ({:?})", path, format);
            load_grid(path, format)?
        }
        None => scenario.build_grid()?,
    };
    info!(
        "Grid {}x{} with {} obstacles",
        grid.rows(),
        grid.cols(),
        grid.obstacles().len()
    );

    let renderer = AnsiRenderer::new().with_color(!args.no_color);
    let mut planner = Planner::new(
        &mut grid,
        scenario.robot.start,
        scenario.robot.end,
        scenario.planner_config(),
    )?;
    info!(
        "Planning {} -> {} (radius {}, {:?})",
        planner.start(),
        planner.end(),
        planner.robot_radius(),
        scenario.search.algorithm
    );

    let outcome = if visualize {
        let mut observer = |snapshot: &GridSnapshot<'_>| {
            // Clear screen and home the cursor before each frame
            print!("\x1b[2J\x1b[H{}", renderer.render(snapshot, RenderView::Binary));
        };
        planner.search_with(&mut observer)?
    } else {
        planner.search()?
    };

    let snapshot = planner.grid().snapshot();
    for view in [RenderView::Binary, RenderView::Clearance, RenderView::GoalCost] {
        println!("{}", renderer.render(&snapshot, view));
    }

    match &outcome {
        SearchOutcome::Found(path) => {
            info!("Path found after {} expansions", path.expanded());
            println!(
                "Found path: {} cells, cost {:.3}",
                path.len(),
                path.cost()
            );
            let cells: Vec<String> = path.cells().iter().map(ToString::to_string).collect();
            println!("{}", cells.join(" -> "));
        }
        SearchOutcome::NotFound { expanded } => {
            info!("Open set exhausted after {} expansions", expanded);
            println!("No path found");
        }
    }

    if let Some(path) = &args.save {
        save_grid(planner.grid(), path, format)?;
        info!("Saved grid to {:?}", path);
    }

    Ok(())
}
