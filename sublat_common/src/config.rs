//! Configuration for lattice construction and occurrence counting.
//!
//! Quick examples
//!
//! Default (auto strategy, strict order check, sequential):
//! ```
//! use sublat_common::Config;
//! let cfg = Config::default();
//! assert!(cfg.strict_order);
//! ```
//!
//! Always use the lattice and evaluate layers in parallel:
//! ```
//! use sublat_common::{Config, CountStrategy};
//! let cfg = Config::builder()
//!     .strategy(CountStrategy::Lattice)
//!     .parallel(true)
//!     .build();
//! assert!(cfg.parallel);
//! ```

use serde::{Deserialize, Serialize};

/// Pattern count below which [`CountStrategy::Auto`] skips the lattice.
pub const DEFAULT_MIN_PATTERNS: usize = 8;

/// How occurrences are counted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CountStrategy {
    /// Build the lattice and prune database candidates layer by layer.
    Lattice,
    /// Test every pattern against every database graph.
    BruteForce,
    /// Brute force below `min_patterns` patterns, lattice otherwise.
    Auto {
        /// Smallest pattern count for which the lattice is built.
        min_patterns: usize,
    },
}

impl CountStrategy {
    /// Resolves `Auto` for a concrete pattern count.
    ///
    /// Returns true when the lattice should be used.
    pub const fn uses_lattice(self, pattern_count: usize) -> bool {
        match self {
            Self::Lattice => true,
            Self::BruteForce => false,
            Self::Auto { min_patterns } => pattern_count >= min_patterns,
        }
    }
}

impl Default for CountStrategy {
    fn default() -> Self {
        Self::Auto {
            min_patterns: DEFAULT_MIN_PATTERNS,
        }
    }
}

/// Global configuration.
///
/// - parallel: evaluate all nodes of one layer concurrently. Only has an
///   effect when `sublat_lattice` is built with its `parallel` feature.
/// - strict_order: after construction, test every covering edge for reverse
///   containment and reject mutually containing patterns.
/// - strategy: lattice based, brute force, or picked by pattern count.
/// - override_names: rename every pattern by index in reports, not only the
///   unnamed ones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Evaluate the nodes of a layer in parallel.
    pub parallel: bool,
    /// Reject patterns that contain each other.
    pub strict_order: bool,
    /// Counting strategy.
    pub strategy: CountStrategy,
    /// Rename all patterns by index when reporting.
    pub override_names: bool,
}

impl Config {
    /// Start a builder from the default configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parallel: false,
            strict_order: true,
            strategy: CountStrategy::default(),
            override_names: false,
        }
    }
}

/// Builder for [`Config`].
#[derive(Clone, Debug, Default)]
pub struct ConfigBuilder {
    /// Configuration being assembled.
    inner: Config,
}

impl ConfigBuilder {
    /// Set layer parallelism.
    #[must_use]
    pub const fn parallel(mut self, parallel: bool) -> Self {
        self.inner.parallel = parallel;
        self
    }

    /// Enable or disable the reverse containment check.
    #[must_use]
    pub const fn strict_order(mut self, strict_order: bool) -> Self {
        self.inner.strict_order = strict_order;
        self
    }

    /// Set the counting strategy.
    #[must_use]
    pub const fn strategy(mut self, strategy: CountStrategy) -> Self {
        self.inner.strategy = strategy;
        self
    }

    /// Rename every pattern by index in reports.
    #[must_use]
    pub const fn override_names(mut self, override_names: bool) -> Self {
        self.inner.override_names = override_names;
        self
    }

    /// Finish building.
    pub fn build(self) -> Config {
        self.inner
    }
}
