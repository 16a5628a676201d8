//! Backtracking subgraph monomorphism search.
//!
//! A needle embeds into a host if there is an injective, label preserving
//! node mapping under which every needle edge maps to a host edge. Extra host
//! edges between mapped nodes are allowed (non-induced matching).

use std::collections::HashSet;

use tracing::trace;

use crate::index::{GraphIndex, NodeId};

/// Lightweight state for one search.
struct State {
    /// Needle node -> host node, indexed by needle node.
    mapping: Vec<Option<NodeId>>,
    used_host: HashSet<NodeId>,
    mapped: usize,
}

impl State {
    fn new(needle_nodes: usize) -> Self {
        Self {
            mapping: vec![None; needle_nodes],
            used_host: HashSet::new(),
            mapped: 0,
        }
    }

    fn mapped_to(&self, needle: NodeId) -> Option<NodeId> {
        self.mapping[needle as usize]
    }

    fn is_used_host(&self, host: NodeId) -> bool {
        self.used_host.contains(&host)
    }

    fn map(&mut self, needle: NodeId, host: NodeId) {
        self.mapping[needle as usize] = Some(host);
        self.used_host.insert(host);
        self.mapped += 1;
    }

    fn unmap(&mut self, needle: NodeId, host: NodeId) {
        self.mapping[needle as usize] = None;
        self.used_host.remove(&host);
        self.mapped -= 1;
    }

    fn done(&self) -> bool {
        self.mapped == self.mapping.len()
    }
}

/// Embedding search of one needle into one host.
pub(crate) struct Matcher<'a> {
    needle: &'a GraphIndex,
    host: &'a GraphIndex,
    /// Needle nodes in the order they get mapped.
    order: Vec<NodeId>,
}

impl<'a> Matcher<'a> {
    pub(crate) fn new(needle: &'a GraphIndex, host: &'a GraphIndex) -> Self {
        let order = Self::mapping_order(needle, host);
        Self {
            needle,
            host,
            order,
        }
    }

    /// Counts embeddings, stopping early once `limit` is reached.
    pub(crate) fn count(&self, limit: Option<usize>) -> usize {
        if !self.feasible() {
            return 0;
        }
        if self.order.is_empty() {
            // The empty graph embeds exactly once.
            return 1;
        }

        let mut state = State::new(self.needle.node_count());
        let mut found = 0;
        self.backtrack(&mut state, 0, limit, &mut found);
        trace!(found, "embedding search finished");
        found
    }

    /// Cheap necessary conditions checked before any backtracking.
    fn feasible(&self) -> bool {
        if self.needle.node_count() > self.host.node_count()
            || self.needle.edge_count() > self.host.edge_count()
        {
            return false;
        }
        self.needle
            .label_histogram()
            .all(|(label, count)| self.host.label_count(label) >= count)
    }

    fn backtrack(&self, state: &mut State, depth: usize, limit: Option<usize>, found: &mut usize) {
        if limit.is_some_and(|limit| *found >= limit) {
            return;
        }
        if state.done() {
            *found += 1;
            return;
        }

        let needle_current = self.order[depth];
        for host_candidate in self.candidates(needle_current, state) {
            state.map(needle_current, host_candidate);
            self.backtrack(state, depth + 1, limit, found);
            state.unmap(needle_current, host_candidate);

            if limit.is_some_and(|limit| *found >= limit) {
                return;
            }
        }
    }

    /// Host nodes that `needle_current` may map to under the current state.
    fn candidates(&self, needle_current: NodeId, state: &State) -> Vec<NodeId> {
        // Every edge to an already mapped needle node restricts the host
        // candidates to the fanout or fanin of that node's image.
        let mut constraint_sets: Vec<&HashSet<NodeId>> = Vec::new();
        for &pred in self.needle.fanin(needle_current) {
            if pred == needle_current {
                continue;
            }
            if let Some(host_pred) = state.mapped_to(pred) {
                constraint_sets.push(self.host.fanout(host_pred));
            }
        }
        for &succ in self.needle.fanout(needle_current) {
            if succ == needle_current {
                continue;
            }
            if let Some(host_succ) = state.mapped_to(succ) {
                constraint_sets.push(self.host.fanin(host_succ));
            }
        }

        let label = self.needle.label_of(needle_current);
        let unfiltered: Vec<NodeId> = if constraint_sets.is_empty() {
            // Nothing mapped nearby yet: every host node with the same label.
            self.host.nodes_labeled(label).to_vec()
        } else {
            let mut candidates: Vec<NodeId> = intersection(&constraint_sets).into_iter().collect();
            candidates.sort_unstable();
            candidates
        };

        let needs_loop = self.needle.has_edge(needle_current, needle_current);
        unfiltered
            .into_iter()
            .filter(|&host_node| self.host.label_of(host_node) == label)
            .filter(|&host_node| !state.is_used_host(host_node))
            .filter(|&host_node| !needs_loop || self.host.has_edge(host_node, host_node))
            .filter(|&host_node| self.host.degree(host_node) >= self.needle.degree(needle_current))
            .collect()
    }

    /// Rarest-label anchor first, then greedily the node with the most
    /// already ordered neighbours so candidates stay constrained.
    fn mapping_order(needle: &GraphIndex, host: &GraphIndex) -> Vec<NodeId> {
        let node_count = needle.node_count();
        let mut order: Vec<NodeId> = Vec::with_capacity(node_count);
        let mut placed = vec![false; node_count];

        while order.len() < node_count {
            let next = (0..node_count as NodeId)
                .filter(|&n| !placed[n as usize])
                .max_by_key(|&n| {
                    let connected = needle
                        .fanin(n)
                        .iter()
                        .chain(needle.fanout(n))
                        .filter(|&&m| m != n && placed[m as usize])
                        .count();
                    let rarity = usize::MAX - host.label_count(needle.label_of(n));
                    // Lower ids win ties so the order is deterministic.
                    (connected, rarity, needle.degree(n), usize::MAX - n as usize)
                });
            let Some(next) = next else {
                break;
            };
            placed[next as usize] = true;
            order.push(next);
        }
        order
    }
}

/// Intersects a non-empty list of sets.
fn intersection(sets: &[&HashSet<NodeId>]) -> HashSet<NodeId> {
    let Some((first, rest)) = sets.split_first() else {
        return HashSet::new();
    };
    rest.iter().fold((*first).clone(), |acc, set| {
        acc.intersection(set).copied().collect()
    })
}

#[cfg(test)]
mod tests {
    use crate::LabeledGraph;
    use rstest::rstest;
    use sublat_common::{Contains, CountEmbeddings};

    fn graph(labels: &[&str], edges: &[(u32, u32)]) -> LabeledGraph {
        LabeledGraph::from_parts(None, labels.iter().copied(), edges.iter().copied()).unwrap()
    }

    #[rstest]
    #[case::node_in_edge(&["x", "x"], &[(0, 1)], &["x"], &[], true)]
    #[case::label_mismatch(&["x", "x"], &[(0, 1)], &["y"], &[], false)]
    #[case::edge_in_cycle(&["x", "x", "x"], &[(0, 1), (1, 2), (2, 0)], &["x", "x"], &[(0, 1)], true)]
    #[case::direction_matters(&["x", "y"], &[(0, 1)], &["x", "y"], &[(1, 0)], false)]
    #[case::non_induced(&["x", "x"], &[(0, 1), (1, 0)], &["x", "x"], &[(0, 1)], true)]
    #[case::needs_self_loop(&["x", "x"], &[(0, 1)], &["x"], &[(0, 0)], false)]
    #[case::self_loop_present(&["x"], &[(0, 0)], &["x"], &[(0, 0)], true)]
    #[case::injective(&["x"], &[], &["x", "x"], &[], false)]
    #[case::path_in_cycle(&["x", "x", "x"], &[(0, 1), (1, 2), (2, 0)], &["x", "x", "x"], &[(0, 1), (1, 2)], true)]
    #[case::cycle_not_in_path(&["x", "x", "x"], &[(0, 1), (1, 2)], &["x", "x", "x"], &[(0, 1), (1, 2), (2, 0)], false)]
    #[case::disconnected_needle(&["x", "x", "x"], &[(0, 1), (1, 2), (2, 0)], &["x", "x"], &[], true)]
    fn containment_cases(
        #[case] host_labels: &[&str],
        #[case] host_edges: &[(u32, u32)],
        #[case] needle_labels: &[&str],
        #[case] needle_edges: &[(u32, u32)],
        #[case] expected: bool,
    ) {
        let host = graph(host_labels, host_edges);
        let needle = graph(needle_labels, needle_edges);
        assert_eq!(host.contains(&needle).unwrap(), expected);
    }

    #[test]
    fn counts_rotations_of_a_directed_triangle() {
        let triangle = graph(&["x", "x", "x"], &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(triangle.count_embeddings(&triangle).unwrap(), 3);

        let edge = graph(&["x", "x"], &[(0, 1)]);
        assert_eq!(triangle.count_embeddings(&edge).unwrap(), 3);
    }

    #[test]
    fn empty_needle_embeds_once() {
        let empty = LabeledGraph::new();
        let host = graph(&["x"], &[]);
        assert_eq!(host.count_embeddings(&empty).unwrap(), 1);
        assert!(empty.contains(&empty).unwrap());
    }

    #[test]
    fn limit_stops_early() {
        let host = graph(&["x", "x", "x", "x"], &[]);
        let needle = graph(&["x"], &[]);
        assert_eq!(host.embeddings(&needle, Some(2)).unwrap(), 2);
        assert_eq!(host.embeddings(&needle, None).unwrap(), 4);
    }
}
