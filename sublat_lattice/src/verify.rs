//! Invariant checks over a finished lattice.
//!
//! The structural checks only read the adjacency lists, layers and occurrence
//! sets. The containment checks call the predicate again and cost one
//! evaluation per edge or per ordered pair respectively.

use std::collections::{HashSet, VecDeque};

use sublat_common::Contains;
use tracing::debug;

use crate::error::VerifyError;
use crate::node::{NodeIdx, PatternNode};
use crate::{Lattice, LatticeError};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Done,
}

/// Fails if following child edges ever leads back to a node on the path.
pub fn check_acyclic<G>(nodes: &[PatternNode<G>]) -> Result<(), VerifyError> {
    let mut marks = vec![Mark::Unvisited; nodes.len()];

    for start in 0..nodes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        marks[start] = Mark::Active;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];

        while let Some((current, cursor)) = stack.last_mut() {
            let children = &nodes[*current].children;
            let Some(&next) = children.get(*cursor) else {
                marks[*current] = Mark::Done;
                stack.pop();
                continue;
            };
            *cursor += 1;

            let next = next.as_usize();
            if next >= nodes.len() {
                return Err(VerifyError::UnknownNode(NodeIdx::from(next)));
            }
            match marks[next] {
                Mark::Active => return Err(VerifyError::Cycle { node: NodeIdx::from(next) }),
                Mark::Done => {}
                Mark::Unvisited => {
                    marks[next] = Mark::Active;
                    stack.push((next, 0));
                }
            }
        }
    }
    Ok(())
}

/// Fails if an edge appears in a child list but not the matching parent list,
/// or the other way round.
pub fn check_one_sided<G>(nodes: &[PatternNode<G>]) -> Result<(), VerifyError> {
    for (i, node) in nodes.iter().enumerate() {
        let idx = NodeIdx::from(i);
        for &child in &node.children {
            let other = nodes.get(child.as_usize()).ok_or(VerifyError::UnknownNode(child))?;
            if !other.parents.contains(&idx) {
                return Err(VerifyError::OneSided { parent: idx, child });
            }
        }
        for &parent in &node.parents {
            let other = nodes.get(parent.as_usize()).ok_or(VerifyError::UnknownNode(parent))?;
            if !other.children.contains(&idx) {
                return Err(VerifyError::OneSided { parent, child: idx });
            }
        }
    }
    Ok(())
}

/// Fails if some edge `parent -> child` is also implied by a longer path.
pub fn check_covering<G>(nodes: &[PatternNode<G>]) -> Result<(), VerifyError> {
    for (i, node) in nodes.iter().enumerate() {
        let child = NodeIdx::from(i);
        for &parent in &node.parents {
            let mut seen: HashSet<NodeIdx> = HashSet::new();
            let mut queue: VecDeque<NodeIdx> = node
                .parents
                .iter()
                .copied()
                .filter(|&p| p != parent)
                .collect();

            while let Some(up) = queue.pop_front() {
                if up == parent {
                    return Err(VerifyError::Shortcut { parent, child });
                }
                if !seen.insert(up) {
                    continue;
                }
                let above = nodes.get(up.as_usize()).ok_or(VerifyError::UnknownNode(up))?;
                queue.extend(above.parents.iter().copied());
            }
        }
    }
    Ok(())
}

/// Fails if a parent is not on a strictly higher layer than its child.
pub fn check_layers<G>(nodes: &[PatternNode<G>]) -> Result<(), VerifyError> {
    for (i, node) in nodes.iter().enumerate() {
        let parent = NodeIdx::from(i);
        for &child in &node.children {
            let below = nodes.get(child.as_usize()).ok_or(VerifyError::UnknownNode(child))?;
            if node.layer <= below.layer {
                return Err(VerifyError::LayerOrder {
                    parent,
                    parent_layer: node.layer,
                    child,
                    child_layer: below.layer,
                });
            }
        }
    }
    Ok(())
}

/// Fails if a parent occurs in a database graph that one of its children
/// does not occur in.
pub fn check_occurrence_monotonicity<G>(nodes: &[PatternNode<G>]) -> Result<(), VerifyError> {
    for (i, node) in nodes.iter().enumerate() {
        let parent = NodeIdx::from(i);
        for &child in &node.children {
            let below = nodes.get(child.as_usize()).ok_or(VerifyError::UnknownNode(child))?;
            if let Some(&graph) = node.occurrences.difference(&below.occurrences).next() {
                return Err(VerifyError::OccurrenceOrder {
                    parent,
                    child,
                    graph,
                });
            }
        }
    }
    Ok(())
}

impl<G> Lattice<G> {
    /// Runs every structural check: acyclicity, edge symmetry, absence of
    /// shortcut edges, layer order and occurrence monotonicity.
    ///
    /// Occurrence monotonicity holds trivially before counting.
    pub fn verify_structure(&self) -> Result<(), VerifyError> {
        check_one_sided(&self.nodes)?;
        check_acyclic(&self.nodes)?;
        check_covering(&self.nodes)?;
        check_layers(&self.nodes)?;
        check_occurrence_monotonicity(&self.nodes)?;
        debug!("Structural checks passed for {} nodes", self.nodes.len());
        Ok(())
    }
}

/// Fails if an edge is not backed by the containment predicate.
pub fn check_soundness<G: Contains>(nodes: &[PatternNode<G>]) -> Result<(), LatticeError<G::Error>> {
    for (i, node) in nodes.iter().enumerate() {
        let parent = NodeIdx::from(i);
        for &child in &node.children {
            let below = nodes.get(child.as_usize()).ok_or(VerifyError::UnknownNode(child))?;
            let holds = node
                .pattern()
                .contains(below.pattern())
                .map_err(|source| LatticeError::predicate(parent, child, source))?;
            if !holds {
                return Err(VerifyError::Unsound { parent, child }.into());
            }
        }
    }
    Ok(())
}

/// Fails if some pattern contains another without a path connecting them.
///
/// Quadratic in the number of patterns.
pub fn check_completeness<G: Contains>(nodes: &[PatternNode<G>]) -> Result<(), LatticeError<G::Error>> {
    for (i, upper) in nodes.iter().enumerate() {
        let container = NodeIdx::from(i);
        for (j, lower) in nodes.iter().enumerate() {
            if i == j {
                continue;
            }
            let contained = NodeIdx::from(j);
            let holds = upper
                .pattern()
                .contains(lower.pattern())
                .map_err(|source| LatticeError::predicate(container, contained, source))?;
            if holds && !lower.reachable.contains_key(&container) {
                return Err(VerifyError::Unreachable {
                    container,
                    contained,
                }
                .into());
            }
        }
    }
    Ok(())
}

impl<G: Contains> Lattice<G> {
    /// Re-evaluates containment: every edge must be backed by the predicate
    /// and every containing pair must be connected by a path.
    ///
    /// This is quadratic in the number of patterns and meant for tests and
    /// small inputs.
    pub fn verify_containment(&self) -> Result<(), LatticeError<G::Error>> {
        check_soundness(&self.nodes)?;
        check_completeness(&self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::link;

    fn arena(size: usize) -> Vec<PatternNode<()>> {
        (0..size).map(|_| PatternNode::new(())).collect()
    }

    fn wire(nodes: &mut [PatternNode<()>], parent: usize, child: usize) {
        link(nodes, NodeIdx::from(parent), NodeIdx::from(child));
    }

    #[test]
    fn chain_is_acyclic_and_covering() {
        let mut nodes = arena(3);
        wire(&mut nodes, 2, 1);
        wire(&mut nodes, 1, 0);
        assert_eq!(check_acyclic(&nodes), Ok(()));
        assert_eq!(check_covering(&nodes), Ok(()));
        assert_eq!(check_one_sided(&nodes), Ok(()));
    }

    #[test]
    fn cycle_is_reported() {
        let mut nodes = arena(3);
        wire(&mut nodes, 0, 1);
        wire(&mut nodes, 1, 2);
        wire(&mut nodes, 2, 0);
        assert!(matches!(check_acyclic(&nodes), Err(VerifyError::Cycle { .. })));
    }

    #[test]
    fn shortcut_is_reported() {
        let mut nodes = arena(3);
        wire(&mut nodes, 2, 1);
        wire(&mut nodes, 1, 0);
        wire(&mut nodes, 2, 0);
        assert_eq!(
            check_covering(&nodes),
            Err(VerifyError::Shortcut {
                parent: NodeIdx::from(2),
                child: NodeIdx::from(0),
            })
        );
    }

    #[test]
    fn one_sided_edge_is_reported() {
        let mut nodes = arena(2);
        nodes[1].children.push(NodeIdx::from(0));
        assert_eq!(
            check_one_sided(&nodes),
            Err(VerifyError::OneSided {
                parent: NodeIdx::from(1),
                child: NodeIdx::from(0),
            })
        );
    }

    #[test]
    fn flat_layers_are_reported() {
        let mut nodes = arena(2);
        wire(&mut nodes, 1, 0);
        assert!(matches!(check_layers(&nodes), Err(VerifyError::LayerOrder { .. })));
        nodes[1].layer = 1;
        assert_eq!(check_layers(&nodes), Ok(()));
    }

    #[test]
    fn parent_occurring_alone_is_reported() {
        let mut nodes = arena(2);
        wire(&mut nodes, 1, 0);
        nodes[0].occurrences.extend([0, 2]);
        nodes[1].occurrences.extend([0, 1]);
        assert_eq!(
            check_occurrence_monotonicity(&nodes),
            Err(VerifyError::OccurrenceOrder {
                parent: NodeIdx::from(1),
                child: NodeIdx::from(0),
                graph: 1,
            })
        );
    }
}
