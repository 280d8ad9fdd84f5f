use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use recipe_paths::{
    compute_all_pairs, graph_io, init_logging, result_io, Algorithm, EngineOptions,
    DEFAULT_MAX_DIST,
};

#[derive(Parser, Debug)]
#[command(name = "recipe-paths")]
#[command(about = "Precompute the cheapest recipe path between every pair of tiles in a recipe graph.", long_about = None)]
struct Cli {
    /// Log per-source progress
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Compute all tile conversion recipes and write the result matrix
    Tiles(TilesArgs),
    /// Print the recipe sequence between two tiles from a written result matrix
    Path(PathArgs),
}

#[derive(Args, Debug)]
struct TilesArgs {
    /// Binary graph file
    #[arg(short, long, default_value = "graph")]
    graph: PathBuf,

    /// Binary result matrix to write
    #[arg(short, long, default_value = "out")]
    out: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Algorithm::Dial)]
    algorithm: Algorithm,

    /// Distance ceiling for the bucket queue; every path cost must stay below it
    #[arg(long, default_value_t = DEFAULT_MAX_DIST)]
    max_dist: usize,

    /// Also write the matrix as CSV (source, target, distance, predecessor, recipe)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Include unreachable pairs in the CSV output with infinite distance
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,
}

#[derive(Args, Debug)]
struct PathArgs {
    /// Binary result matrix written by `tiles`
    #[arg(short, long, default_value = "out")]
    matrix: PathBuf,

    #[arg(long)]
    from: u32,

    #[arg(long)]
    to: u32,
}

fn engine_options(args: &TilesArgs) -> Result<EngineOptions> {
    if args.max_dist == 0 || args.max_dist > i32::MAX as usize {
        bail!(
            "--max-dist must be between 1 and {}, got {}",
            i32::MAX,
            args.max_dist
        );
    }
    Ok(EngineOptions {
        algorithm: args.algorithm,
        max_dist: args.max_dist,
    })
}

fn run_tiles(args: &TilesArgs) -> Result<()> {
    let options = engine_options(args)?;
    let graph = graph_io::load_graph(&args.graph)?;

    info!("Computing all tile conversion recipes");
    let matrix = compute_all_pairs(&graph, options).context("computing all-pairs recipes")?;

    let reachable = matrix.records().iter().filter(|r| r.is_reachable()).count();
    info!(
        "Reachable pairs: {} of {}",
        reachable,
        matrix.records().len()
    );

    result_io::write_matrix(&args.out, &matrix)?;
    if let Some(csv_path) = &args.csv {
        result_io::write_matrix_csv(csv_path, &matrix, None, args.include_unreachable)?;
    }
    Ok(())
}

fn run_path(args: &PathArgs) -> Result<()> {
    let matrix = result_io::read_matrix(&args.matrix)?;
    let n = matrix.vertex_count();
    for v in [args.from, args.to] {
        if v as usize >= n {
            bail!("tile {} out of range for a matrix of {} tiles", v, n);
        }
    }

    let record = matrix.get(args.from, args.to);
    match matrix.path(args.from, args.to) {
        Some(steps) => {
            println!("cost {}", record.value);
            for step in steps {
                println!("{} -> {} via recipe {}", step.from, step.to, step.recipe);
            }
        }
        None => println!("{} is unreachable from {}", args.to, args.from),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.mode {
        Mode::Tiles(args) => run_tiles(args),
        Mode::Path(args) => run_path(args),
    }
}
