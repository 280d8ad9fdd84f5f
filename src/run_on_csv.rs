use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use recipe_paths::{
    compute_all_pairs, graph_io, init_logging, result_io, Algorithm, EngineOptions,
};

#[derive(Parser, Debug)]
#[command(name = "csv")]
#[command(about = "Build a recipe graph from a CSV with from,to,cost,recipe rows and write the all-pairs recipe matrix as CSV.", long_about = None)]
struct Cli {
    /// Path to the .csv edge list
    #[arg(short, long)]
    csv: PathBuf,

    /// Output CSV (source, target, distance, predecessor, recipe)
    #[arg(short, long)]
    out: PathBuf,

    #[arg(short, long, value_enum, default_value_t = Algorithm::Dial)]
    algorithm: Algorithm,

    /// Include unreachable pairs in output with infinite distance
    #[arg(long, default_value_t = false)]
    include_unreachable: bool,

    /// Also save the parsed graph in the binary graph format
    #[arg(long)]
    save_graph: Option<PathBuf>,

    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let labeled = graph_io::load_csv_graph(&cli.csv)?;
    if let Some(path) = &cli.save_graph {
        graph_io::save_graph(path, &labeled.graph)?;
    }

    let options = EngineOptions {
        algorithm: cli.algorithm,
        ..EngineOptions::default()
    };
    let matrix = compute_all_pairs(&labeled.graph, options).context("computing all-pairs recipes")?;
    result_io::write_matrix_csv(&cli.out, &matrix, Some(labeled.labels.as_slice()), cli.include_unreachable)?;

    Ok(())
}
