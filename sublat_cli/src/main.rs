//! sublat CLI
//!
//! Loads a pattern library and a graph database from JSON, counts in which
//! database graphs every pattern occurs and writes one CSV row per pattern.

#[global_allocator]
/// Global allocator using jemalloc for better performance in parallel workloads.
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

mod args;

use std::fs;

use clap::Parser;
use sublat_graph::load_graphs;
use sublat_lattice::dedup_mutual;
use sublat_report::{Statistics, to_csv_string, write_csv};
use tracing::info;

use args::Args;

/// Runs the counting pipeline.
///
/// This function:
/// 1. Initializes logging
/// 2. Parses command-line arguments
/// 3. Loads patterns and database, optionally deduplicating patterns
/// 4. Builds and prints or exports the lattice when asked to
/// 5. Counts occurrences and writes the report
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let config = args.to_config();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    info!("Loading patterns from {}", args.patterns.display());
    let mut patterns = load_graphs(&args.patterns)?;
    info!("Loading database from {}", args.database.display());
    let database = load_graphs(&args.database)?;

    if args.dedupe {
        let deduped = dedup_mutual(patterns)?;
        for (dropped, kept) in &deduped.dropped {
            info!("Pattern {} duplicates pattern {}, dropping it", dropped, kept);
        }
        patterns = deduped.kept;
    }

    let mut stats = Statistics::new(&patterns, &database, config);

    if args.wants_lattice() {
        let lattice = stats.build_lattice()?;
        if args.describe || args.verbose_describe {
            println!("{}", lattice.describe(args.verbose_describe));
        }
        if let Some(path) = &args.lattice_json {
            fs::write(path, serde_json::to_string_pretty(&lattice.export())?)?;
            info!("Wrote lattice to {}", path.display());
        }
    }

    let summary = stats.compute()?;
    info!(
        "{} containment checks for {} patterns over {} graphs ({} avoided)",
        summary.evaluations, summary.patterns, summary.database_len, summary.pruned
    );

    if args.embeddings {
        stats.compute_embedding_occurrences()?;
    }

    let records = stats.records(&args.tag)?;
    match &args.output {
        Some(path) => write_csv(path, &records)?,
        None => print!("{}", to_csv_string(&records)?),
    }

    let profile = sublat_lattice::profiling::report();
    if !profile.is_empty() {
        eprint!("{profile}");
    }

    Ok(())
}
