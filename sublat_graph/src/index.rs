use std::collections::{HashMap, HashSet};

use crate::LabeledGraph;

pub(crate) type NodeId = u32;

/// Adjacency and label lookups for one graph, built once per graph.
#[derive(Clone, Debug)]
pub(crate) struct GraphIndex {
    /// Label id per node.
    label_ids: Vec<usize>,
    /// Label string to label id.
    label_to_id: HashMap<String, usize>,
    /// Label string per label id.
    label_names: Vec<String>,
    /// Nodes per label id.
    by_label: Vec<Vec<NodeId>>,
    fanout_sets: Vec<HashSet<NodeId>>,
    fanin_sets: Vec<HashSet<NodeId>>,
    edge_count: usize,
}

impl GraphIndex {
    pub(crate) fn build(graph: &LabeledGraph) -> Self {
        let node_count = graph.labels().len();

        let mut label_to_id: HashMap<String, usize> = HashMap::new();
        let mut by_label: Vec<Vec<NodeId>> = Vec::new();
        let mut label_names: Vec<String> = Vec::new();
        let mut label_ids = Vec::with_capacity(node_count);

        for (node, label) in graph.labels().iter().enumerate() {
            let next_id = label_to_id.len();
            let id = *label_to_id.entry(label.clone()).or_insert(next_id);
            if id == by_label.len() {
                by_label.push(Vec::new());
                label_names.push(label.clone());
            }
            by_label[id].push(node as NodeId);
            label_ids.push(id);
        }

        let mut fanout_sets = vec![HashSet::new(); node_count];
        let mut fanin_sets = vec![HashSet::new(); node_count];
        let mut edge_count = 0;
        for &(source, target) in graph.edges() {
            if fanout_sets[source as usize].insert(target) {
                fanin_sets[target as usize].insert(source);
                edge_count += 1;
            }
        }

        Self {
            label_ids,
            label_to_id,
            label_names,
            by_label,
            fanout_sets,
            fanin_sets,
            edge_count,
        }
    }

    pub(crate) fn node_count(&self) -> usize {
        self.label_ids.len()
    }

    pub(crate) const fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub(crate) fn label_of(&self, node: NodeId) -> &str {
        &self.label_names[self.label_ids[node as usize]]
    }

    /// Nodes carrying `label`, empty if the label is absent.
    pub(crate) fn nodes_labeled(&self, label: &str) -> &[NodeId] {
        self.label_to_id
            .get(label)
            .map(|&id| self.by_label[id].as_slice())
            .unwrap_or(&[])
    }

    /// Number of nodes carrying `label`.
    pub(crate) fn label_count(&self, label: &str) -> usize {
        self.nodes_labeled(label).len()
    }

    /// Distinct labels with their node counts.
    pub(crate) fn label_histogram(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.label_names
            .iter()
            .zip(&self.by_label)
            .map(|(label, nodes)| (label.as_str(), nodes.len()))
    }

    pub(crate) fn fanout(&self, node: NodeId) -> &HashSet<NodeId> {
        &self.fanout_sets[node as usize]
    }

    pub(crate) fn fanin(&self, node: NodeId) -> &HashSet<NodeId> {
        &self.fanin_sets[node as usize]
    }

    pub(crate) fn has_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.fanout_sets[source as usize].contains(&target)
    }

    pub(crate) fn degree(&self, node: NodeId) -> usize {
        self.fanout_sets[node as usize].len() + self.fanin_sets[node as usize].len()
    }
}
