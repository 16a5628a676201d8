//! Removal of mutually containing patterns ahead of construction.

use sublat_common::Contains;
use tracing::debug;

use crate::{LatticeError, NodeIdx};

/// Result of [`dedup_mutual`].
#[derive(Clone, Debug)]
pub struct Deduped<G> {
    /// Surviving patterns, in input order.
    pub kept: Vec<G>,
    /// Input positions of the surviving patterns.
    pub kept_indices: Vec<usize>,
    /// `(dropped, representative)` input positions for every removed pattern.
    pub dropped: Vec<(usize, usize)>,
}

/// Keeps the first pattern of every group of mutually containing patterns.
///
/// With a subgraph-isomorphism predicate, mutual containment means the
/// patterns are isomorphic. Each pattern is compared against the survivors so
/// far, in both directions.
pub fn dedup_mutual<G: Contains>(patterns: Vec<G>) -> Result<Deduped<G>, LatticeError<G::Error>> {
    let mut kept_indices: Vec<usize> = Vec::new();
    let mut dropped: Vec<(usize, usize)> = Vec::new();

    for index in 0..patterns.len() {
        let mut duplicate_of = None;
        for &rep in &kept_indices {
            let check = |container: usize, contained: usize| {
                patterns[container]
                    .contains(&patterns[contained])
                    .map_err(|source| {
                        LatticeError::predicate(NodeIdx::from(container), NodeIdx::from(contained), source)
                    })
            };
            if check(rep, index)? && check(index, rep)? {
                duplicate_of = Some(rep);
                break;
            }
        }

        match duplicate_of {
            Some(rep) => dropped.push((index, rep)),
            None => kept_indices.push(index),
        }
    }

    if !dropped.is_empty() {
        debug!("Dropped {} mutually containing patterns", dropped.len());
    }

    let mut keep = vec![false; patterns.len()];
    for &index in &kept_indices {
        keep[index] = true;
    }
    let kept = patterns
        .into_iter()
        .zip(keep)
        .filter_map(|(pattern, keep)| keep.then_some(pattern))
        .collect();

    Ok(Deduped {
        kept,
        kept_indices,
        dropped,
    })
}
