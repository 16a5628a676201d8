//! Layer assignment derived from longest-path distances.

use std::collections::BTreeMap;

use crate::node::{NodeIdx, PatternNode};

/// Nodes grouped by layer, iterated from layer 0 upwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layers {
    by_layer: BTreeMap<usize, Vec<NodeIdx>>,
}

impl Layers {
    /// Nodes on `layer`, empty if the layer does not exist.
    pub fn get(&self, layer: usize) -> &[NodeIdx] {
        self.by_layer.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of non-empty layers.
    pub fn len(&self) -> usize {
        self.by_layer.len()
    }

    /// True when there are no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.by_layer.is_empty()
    }

    /// Highest layer number, if any.
    pub fn max_layer(&self) -> Option<usize> {
        self.by_layer.keys().next_back().copied()
    }

    /// `(layer, nodes)` pairs in ascending layer order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[NodeIdx])> + '_ {
        self.by_layer
            .iter()
            .map(|(&layer, nodes)| (layer, nodes.as_slice()))
    }
}

/// Assigns every node the longest distance by which any descendant reaches
/// it, and groups nodes by that number.
///
/// Nodes within a layer keep input order.
pub(crate) fn compute_layers<G>(nodes: &mut [PatternNode<G>]) -> Layers {
    for node in nodes.iter_mut() {
        node.layer = 0;
    }

    let updates: Vec<(NodeIdx, usize)> = nodes
        .iter()
        .flat_map(|node| node.reachable.iter().map(|(&up, &distance)| (up, distance)))
        .collect();
    for (up, distance) in updates {
        let layer = &mut nodes[up.as_usize()].layer;
        *layer = (*layer).max(distance);
    }

    let mut by_layer: BTreeMap<usize, Vec<NodeIdx>> = BTreeMap::new();
    for (i, node) in nodes.iter().enumerate() {
        by_layer.entry(node.layer).or_default().push(NodeIdx::from(i));
    }

    Layers { by_layer }
}
