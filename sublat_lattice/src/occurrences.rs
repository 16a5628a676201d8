//! Occurrence counting against a graph database.
//!
//! Layers are processed from 0 upwards. A pattern can only occur in a
//! database graph that contains all of its children, so for every node above
//! layer 0 the candidate graphs are the intersection of its children's
//! occurrence sets. Layer 0 nodes have no children and are tested against
//! the whole database.

use std::collections::BTreeSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sublat_common::{Config, Contains};
use tracing::{debug, info};

use crate::node::NodeIdx;
use crate::profiling::Timer;
use crate::{Lattice, LatticeError};

/// Counters collected while counting occurrences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSummary {
    /// Number of patterns counted.
    pub patterns: usize,
    /// Number of database graphs.
    pub database_len: usize,
    /// Containment predicate evaluations performed.
    pub evaluations: usize,
    /// Evaluations a brute-force count would have needed on top.
    pub pruned: usize,
}

impl CountSummary {
    fn new(patterns: usize, database_len: usize) -> Self {
        Self {
            patterns,
            database_len,
            ..Self::default()
        }
    }

    fn close(mut self) -> Self {
        self.pruned = (self.patterns * self.database_len).saturating_sub(self.evaluations);
        self
    }
}

/// Occurrence set of one node plus the number of checks it took.
type NodeCount = (BTreeSet<usize>, usize);

impl<G: Contains + Sync> Lattice<G> {
    /// Computes, for every pattern, the database graphs containing it.
    ///
    /// Previous results are discarded. With `config.parallel` and the
    /// `parallel` feature, the nodes of one layer are evaluated concurrently;
    /// layers themselves always run in order.
    pub fn count_occurrences(
        &mut self,
        database: &[G],
        config: &Config,
    ) -> Result<CountSummary, LatticeError<G::Error>> {
        info!(
            "Counting {} patterns over {} database graphs",
            self.len(),
            database.len()
        );
        validate_database(database)?;

        for node in &mut self.nodes {
            node.occurrences.clear();
        }

        let mut summary = CountSummary::new(self.len(), database.len());
        let mut found: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); self.len()];

        for (layer, members) in self.layers.iter() {
            let counted = self.evaluate_layer(members, &found, database, config.parallel)?;

            let mut layer_evaluations = 0;
            for (idx, (occurrences, evaluations)) in members.iter().zip(counted) {
                layer_evaluations += evaluations;
                found[idx.as_usize()] = occurrences;
            }
            summary.evaluations += layer_evaluations;

            debug!(
                "Layer {}: {} nodes, {} containment checks",
                layer,
                members.len(),
                layer_evaluations
            );
        }

        // Only a complete count reaches the nodes.
        for (node, occurrences) in self.nodes.iter_mut().zip(found) {
            node.occurrences = occurrences;
        }

        let summary = summary.close();
        info!(
            "Counting finished: {} checks, {} avoided",
            summary.evaluations, summary.pruned
        );
        Ok(summary)
    }

    fn evaluate_layer(
        &self,
        members: &[NodeIdx],
        found: &[BTreeSet<usize>],
        database: &[G],
        parallel: bool,
    ) -> Result<Vec<NodeCount>, LatticeError<G::Error>> {
        #[cfg(feature = "parallel")]
        if parallel {
            return members
                .par_iter()
                .map(|&idx| self.evaluate_node(idx, found, database))
                .collect();
        }

        #[cfg(not(feature = "parallel"))]
        let _ = parallel;

        members
            .iter()
            .map(|&idx| self.evaluate_node(idx, found, database))
            .collect()
    }

    /// Tests one node against its candidate graphs. `found` must already
    /// hold the final occurrence sets of its children.
    fn evaluate_node(
        &self,
        idx: NodeIdx,
        found: &[BTreeSet<usize>],
        database: &[G],
    ) -> Result<NodeCount, LatticeError<G::Error>> {
        let node = &self.nodes[idx.as_usize()];

        let candidates: Vec<usize> = if node.children.is_empty() {
            (0..database.len()).collect()
        } else {
            let child_sets: Vec<&BTreeSet<usize>> = node
                .children
                .iter()
                .map(|child| &found[child.as_usize()])
                .collect();
            intersection(child_sets)
        };

        let mut occurrences = BTreeSet::new();
        for &graph in &candidates {
            let _t = Timer::new("count::contains");
            if database[graph]
                .contains(node.pattern())
                .map_err(|source| LatticeError::database(graph, idx, source))?
            {
                occurrences.insert(graph);
            }
        }
        Ok((occurrences, candidates.len()))
    }
}

/// Tests every pattern against every database graph, without a lattice.
///
/// Returns one occurrence set per pattern, in input order.
pub fn brute_force_occurrences<G: Contains + Sync>(
    patterns: &[G],
    database: &[G],
    config: &Config,
) -> Result<(Vec<BTreeSet<usize>>, CountSummary), LatticeError<G::Error>> {
    info!(
        "Brute-force counting {} patterns over {} database graphs",
        patterns.len(),
        database.len()
    );
    for (index, pattern) in patterns.iter().enumerate() {
        pattern
            .validate()
            .map_err(|source| LatticeError::MalformedPattern { index, source })?;
    }
    validate_database(database)?;

    let count_one = |(index, pattern): (usize, &G)| -> Result<BTreeSet<usize>, LatticeError<G::Error>> {
        let mut occurrences = BTreeSet::new();
        for (graph, host) in database.iter().enumerate() {
            let _t = Timer::new("brute::contains");
            if host
                .contains(pattern)
                .map_err(|source| LatticeError::database(graph, NodeIdx::from(index), source))?
            {
                occurrences.insert(graph);
            }
        }
        Ok(occurrences)
    };

    #[cfg(feature = "parallel")]
    let sets: Vec<BTreeSet<usize>> = if config.parallel {
        patterns.par_iter().enumerate().map(count_one).collect::<Result<_, _>>()?
    } else {
        patterns.iter().enumerate().map(count_one).collect::<Result<_, _>>()?
    };

    #[cfg(not(feature = "parallel"))]
    let sets: Vec<BTreeSet<usize>> = {
        let _ = config;
        patterns.iter().enumerate().map(count_one).collect::<Result<_, _>>()?
    };

    let mut summary = CountSummary::new(patterns.len(), database.len());
    summary.evaluations = patterns.len() * database.len();
    Ok((sets, summary.close()))
}

fn validate_database<G: Contains>(database: &[G]) -> Result<(), LatticeError<G::Error>> {
    for (index, graph) in database.iter().enumerate() {
        graph
            .validate()
            .map_err(|source| LatticeError::MalformedGraph { index, source })?;
    }
    Ok(())
}

/// Intersects occurrence sets, starting from the smallest.
fn intersection(mut sets: Vec<&BTreeSet<usize>>) -> Vec<usize> {
    sets.sort_by_key(|set| set.len());
    let Some((smallest, rest)) = sets.split_first() else {
        return Vec::new();
    };
    smallest
        .iter()
        .copied()
        .filter(|graph| rest.iter().all(|set| set.contains(graph)))
        .collect()
}
