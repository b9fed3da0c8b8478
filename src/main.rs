use anyhow::Result;
use clap::Parser;

mod cluster;
mod config;
mod data;
mod graph;
mod storage;

#[derive(Parser, Debug)]
#[clap(
    name = "voting-bloc-analyzer",
    about = "Voting-bloc cluster analysis of legislative graph data"
)]
struct Cli {
    /// Path to input graph JSON file
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Seed for the node visitation shuffle (omitted = OS entropy)
    #[clap(long)]
    seed: Option<u64>,

    /// Maximum local-moving iterations per phase
    #[clap(long, default_value = "100")]
    max_iterations: usize,

    /// Maximum optimization phases
    #[clap(long, default_value = "10")]
    max_phases: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    log::info!("Starting voting-bloc analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // Create output directory
    std::fs::create_dir_all(&args.output_dir)?;

    // 1. Load data
    let graph_data = data::json::load_graph_data(&args.input)?;

    log::info!(
        "Loaded graph with {} nodes ({} members) and {} edges",
        graph_data.nodes.len(),
        graph_data.person_count(),
        graph_data.edges.len()
    );

    // 2. Detect voting blocs
    let config = config::Config {
        max_iterations: args.max_iterations,
        max_phases: args.max_phases,
        seed: args.seed,
    };
    let result = cluster::detection::detect_voting_clusters_with(&graph_data, &config);

    log::info!("Found {} voting blocs", result.clusters.len());

    // 3. Save results
    storage::save_results(&graph_data, &result, &args.output_dir)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
