//! Named graphs shared by tests across the workspace.
//!
//! All fixtures use the label `"x"` unless the name says otherwise. Edges in
//! the `*_xy` fixtures run from the `x` node to the `y` node.

use crate::LabeledGraph;

/// Builds a fixture. An edge naming a missing node trips a debug assertion.
fn build(name: &str, labels: &[&str], edges: &[(u32, u32)]) -> LabeledGraph {
    let mut graph = LabeledGraph::named(name);
    for label in labels {
        graph.add_node(*label);
    }
    let wired = edges
        .iter()
        .filter(|&&(source, target)| graph.add_edge(source, target).is_ok())
        .count();
    debug_assert_eq!(wired, edges.len(), "fixture {name} has an edge to a missing node");
    graph
}

/// One `x` node.
pub fn single_x() -> LabeledGraph {
    build("single_x", &["x"], &[])
}

/// One `y` node.
pub fn single_y() -> LabeledGraph {
    build("single_y", &["y"], &[])
}

/// Directed edge `x -> x`.
pub fn edge_xx() -> LabeledGraph {
    build("edge_xx", &["x", "x"], &[(0, 1)])
}

/// Directed edge `x -> y`.
pub fn edge_xy() -> LabeledGraph {
    build("edge_xy", &["x", "y"], &[(0, 1)])
}

/// Directed path `x -> x -> x`.
pub fn path_xxx() -> LabeledGraph {
    build("path_xxx", &["x", "x", "x"], &[(0, 1), (1, 2)])
}

/// Directed 3-cycle of `x` nodes.
pub fn triangle_x() -> LabeledGraph {
    build("triangle_x", &["x", "x", "x"], &[(0, 1), (1, 2), (2, 0)])
}

/// `x -> x -> y`.
pub fn path_xxy() -> LabeledGraph {
    build("path_xxy", &["x", "x", "y"], &[(0, 1), (1, 2)])
}

/// A directed 3-cycle of `x` nodes plus one isolated `x`.
pub fn triangle_plus_x() -> LabeledGraph {
    build(
        "triangle_plus_x",
        &["x", "x", "x", "x"],
        &[(0, 1), (1, 2), (2, 0)],
    )
}

/// Patterns of the single-node / edge / triangle chain, in that order.
pub fn chain_patterns() -> Vec<LabeledGraph> {
    vec![single_x(), edge_xx(), triangle_x()]
}

/// A small library with branching containment between `x` and `y` motifs.
pub fn mixed_patterns() -> Vec<LabeledGraph> {
    vec![
        single_x(),
        single_y(),
        edge_xx(),
        edge_xy(),
        path_xxx(),
        path_xxy(),
        triangle_x(),
    ]
}

/// A database exercising every pattern of [`mixed_patterns`].
pub fn mixed_database() -> Vec<LabeledGraph> {
    vec![
        triangle_plus_x(),
        build("lonely_y", &["y"], &[]),
        build("xy_pair", &["x", "y"], &[(0, 1)]),
        build("long_path", &["x", "x", "x", "y"], &[(0, 1), (1, 2), (2, 3)]),
        build("reversed", &["y", "x"], &[(0, 1)]),
        LabeledGraph::new(),
    ]
}

lazy_static::lazy_static! {
    /// The triangle-plus-isolated-node database used by the chain scenario.
    pub static ref CHAIN_DATABASE: Vec<LabeledGraph> = vec![triangle_plus_x()];
}
