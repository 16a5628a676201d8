//! Serializable and textual views of a lattice.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use sublat_common::GraphMeta;

use crate::node::NodeIdx;
use crate::Lattice;

/// Relation label carried by every exported edge.
pub const SUBGRAPH_RELATION: &str = "subgraph";

/// A pattern in the exported graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNode {
    /// Node index.
    pub id: usize,
    /// Pattern name, or the index when the pattern has none.
    pub label: String,
    /// Layer of the node.
    pub layer: usize,
}

/// A covering edge in the exported graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportEdge {
    /// Containing pattern.
    pub parent: usize,
    /// Contained pattern.
    pub child: usize,
    /// Always [`SUBGRAPH_RELATION`].
    pub label: String,
}

/// Directed-graph form of a lattice, ready for serialization.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatticeExport {
    /// One entry per pattern, in input order.
    pub nodes: Vec<ExportNode>,
    /// One entry per covering edge.
    pub edges: Vec<ExportEdge>,
}

impl<G: GraphMeta> Lattice<G> {
    /// Display name of a node.
    pub fn label(&self, idx: NodeIdx) -> String {
        self.pattern(idx)
            .and_then(GraphMeta::name)
            .map_or_else(|| idx.as_usize().to_string(), str::to_owned)
    }

    /// Builds the directed-graph representation.
    pub fn export(&self) -> LatticeExport {
        let nodes = self
            .indices()
            .map(|idx| ExportNode {
                id: idx.as_usize(),
                label: self.label(idx),
                layer: self.nodes[idx.as_usize()].layer(),
            })
            .collect();

        let edges = self
            .edges()
            .into_iter()
            .map(|(parent, child)| ExportEdge {
                parent: parent.as_usize(),
                child: child.as_usize(),
                label: SUBGRAPH_RELATION.to_owned(),
            })
            .collect();

        LatticeExport { nodes, edges }
    }

    /// Textual listing, one `Layer: k; Nodes: a|b` line per layer.
    ///
    /// With `verbose`, every node additionally gets a line with its children
    /// and a line with its layer and longest distances to its ancestors.
    pub fn describe(&self, verbose: bool) -> String {
        let mut lines: Vec<String> = self
            .layers
            .iter()
            .map(|(layer, members)| {
                format!(
                    "Layer: {}; Nodes: {}",
                    layer,
                    members.iter().map(|&idx| self.label(idx)).join("|")
                )
            })
            .collect();

        if verbose {
            for idx in self.indices() {
                let node = &self.nodes[idx.as_usize()];
                lines.push(format!(
                    "Node: {}; Children: {}",
                    self.label(idx),
                    node.children().iter().map(|&child| self.label(child)).join("|")
                ));
                lines.push(format!(
                    "Layer: {}; Reachable: {}",
                    node.layer(),
                    node.reachable()
                        .iter()
                        .sorted()
                        .map(|(&ancestor, distance)| format!("{}:{}", self.label(ancestor), distance))
                        .join(", ")
                ));
            }
        }

        lines.join("\n")
    }
}
