use std::path::PathBuf;

use clap::Parser;
use sublat_common::{Config, CountStrategy, DEFAULT_MIN_PATTERNS};

/// sublat - count pattern occurrences in a graph database through a
/// subgraph containment lattice
#[derive(Parser, Debug)]
#[command(name = "sublat")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON file holding the pattern graphs
    #[arg(short = 'p', long)]
    pub patterns: PathBuf,

    /// JSON file holding the database graphs
    #[arg(short = 'd', long)]
    pub database: PathBuf,

    /// CSV file to write; rows go to stdout when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Tag written into every row
    #[arg(short = 't', long, default_value = "")]
    pub tag: String,

    /// How occurrences are counted
    #[arg(long, value_enum, default_value = "auto")]
    pub strategy: StrategyArg,

    /// Pattern count from which `auto` uses the lattice
    #[arg(long, default_value_t = DEFAULT_MIN_PATTERNS)]
    pub min_patterns: usize,

    /// Evaluate the patterns of one layer in parallel
    #[arg(long, default_value_t = false)]
    pub parallel: bool,

    /// Worker threads for parallel evaluation (rayon default when omitted)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Skip the reverse containment check on lattice edges
    #[arg(long, default_value_t = false)]
    pub no_strict_order: bool,

    /// Drop patterns isomorphic to an earlier one before building
    #[arg(long, default_value_t = false)]
    pub dedupe: bool,

    /// Also count embeddings per pattern
    #[arg(long, default_value_t = false)]
    pub embeddings: bool,

    /// Name every pattern by its position instead of only unnamed ones
    #[arg(long, default_value_t = false)]
    pub override_names: bool,

    /// Print the lattice layers
    #[arg(long, default_value_t = false)]
    pub describe: bool,

    /// Print the lattice layers plus children and distances per node
    #[arg(long, default_value_t = false)]
    pub verbose_describe: bool,

    /// Write the lattice as JSON to this file
    #[arg(long)]
    pub lattice_json: Option<PathBuf>,
}

impl Args {
    /// Convert command-line arguments into internal configuration
    pub fn to_config(&self) -> Config {
        Config::builder()
            .parallel(self.parallel)
            .strict_order(!self.no_strict_order)
            .strategy(self.strategy.resolve(self.min_patterns))
            .override_names(self.override_names)
            .build()
    }

    /// True if the lattice has to exist regardless of the counting strategy.
    pub fn wants_lattice(&self) -> bool {
        self.describe || self.verbose_describe || self.lattice_json.is_some()
    }
}

/// Command-line argument wrapper for CountStrategy
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StrategyArg {
    /// Always build the lattice
    #[value(name = "lattice")]
    Lattice,
    /// Test every pattern against every graph
    #[value(name = "brute-force")]
    BruteForce,
    /// Lattice from `--min-patterns` patterns on
    #[value(name = "auto")]
    Auto,
}

impl StrategyArg {
    fn resolve(self, min_patterns: usize) -> CountStrategy {
        match self {
            StrategyArg::Lattice => CountStrategy::Lattice,
            StrategyArg::BruteForce => CountStrategy::BruteForce,
            StrategyArg::Auto => CountStrategy::Auto { min_patterns },
        }
    }
}
