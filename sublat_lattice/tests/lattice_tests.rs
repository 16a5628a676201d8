mod common;

use std::collections::BTreeSet;

use rstest::rstest;
use sublat_common::Config;
use sublat_graph::fixtures::{self, CHAIN_DATABASE};
use sublat_graph::{LabeledGraph, parse_graphs};
use sublat_lattice::{Lattice, LatticeError, NodeIdx, brute_force_occurrences};

use common::{Calls, Fragile, init_test_logger};

fn idx(i: usize) -> NodeIdx {
    NodeIdx::from(i)
}

fn named_edges(lattice: &Lattice<LabeledGraph>) -> BTreeSet<(String, String)> {
    lattice
        .edges()
        .into_iter()
        .map(|(parent, child)| (lattice.label(parent), lattice.label(child)))
        .collect()
}

fn edge(parent: &str, child: &str) -> (String, String) {
    (parent.to_owned(), child.to_owned())
}

#[test]
fn chain_keeps_covering_edges_and_counts_in_three_checks() {
    init_test_logger();
    let config = Config::default();

    let mut lattice = Lattice::build(fixtures::chain_patterns(), &config).unwrap();

    assert_eq!(lattice.edges(), vec![(idx(1), idx(0)), (idx(2), idx(1))]);
    assert!(lattice.is_ancestor(idx(2), idx(0)));
    assert_eq!(lattice.node(idx(0)).unwrap().distance_to(idx(2)), Some(2));
    assert_eq!(lattice.layers().get(0), &[idx(0)]);
    assert_eq!(lattice.layers().get(1), &[idx(1)]);
    assert_eq!(lattice.layers().get(2), &[idx(2)]);

    let summary = lattice.count_occurrences(&CHAIN_DATABASE, &config).unwrap();
    assert_eq!(summary.evaluations, 3);
    assert_eq!(summary.pruned, 0);
    for set in lattice.occurrence_sets() {
        assert_eq!(set, &BTreeSet::from([0]));
    }

    lattice.verify_structure().unwrap();
    lattice.verify_containment().unwrap();
}

#[test]
fn chain_with_counting_predicate() {
    init_test_logger();
    let calls = Calls::default();
    let patterns = vec![calls.atoms(&[1]), calls.atoms(&[1, 2]), calls.atoms(&[1, 2, 3])];
    let database = vec![calls.atoms(&[1, 2, 3, 4])];

    let mut lattice = Lattice::build(patterns, &Config::default()).unwrap();
    assert_eq!(lattice.edges(), vec![(idx(1), idx(0)), (idx(2), idx(1))]);

    calls.reset();
    let summary = lattice.count_occurrences(&database, &Config::default()).unwrap();
    assert_eq!(calls.get(), 3);
    assert_eq!(summary.evaluations, 3);
    assert_eq!(lattice.occurrence_counts(), vec![1, 1, 1]);
}

#[test]
fn failing_children_prune_the_parents() {
    init_test_logger();
    let calls = Calls::default();
    let patterns = vec![calls.atoms(&[1]), calls.atoms(&[1, 2]), calls.atoms(&[1, 2, 3])];
    let database: Vec<_> = (0..5).map(|i| calls.atoms(&[10 + i, 20 + i])).collect();

    let mut lattice = Lattice::build(patterns, &Config::default()).unwrap();
    calls.reset();
    let summary = lattice.count_occurrences(&database, &Config::default()).unwrap();

    // Only the leaf is tested; nothing survives to be intersected.
    assert_eq!(calls.get(), 5);
    assert_eq!(summary.pruned, 10);
    assert_eq!(lattice.occurrence_counts(), vec![0, 0, 0]);
}

#[rstest]
#[case(&[0, 1, 2])]
#[case(&[2, 1, 0])]
#[case(&[1, 2, 0])]
#[case(&[2, 0, 1])]
#[case(&[0, 2, 1])]
#[case(&[1, 0, 2])]
fn chain_is_independent_of_input_order(#[case] order: &[usize]) {
    init_test_logger();
    let chain = fixtures::chain_patterns();
    let patterns: Vec<LabeledGraph> = order.iter().map(|&i| chain[i].clone()).collect();

    let mut lattice = Lattice::build(patterns, &Config::default()).unwrap();

    assert_eq!(
        named_edges(&lattice),
        BTreeSet::from([edge("edge_xx", "single_x"), edge("triangle_x", "edge_xx")])
    );
    let summary = lattice.count_occurrences(&CHAIN_DATABASE, &Config::default()).unwrap();
    assert_eq!(summary.evaluations, 3);
}

#[test]
fn mixed_library_forms_the_hasse_diagram() {
    init_test_logger();
    let lattice = Lattice::build(fixtures::mixed_patterns(), &Config::default()).unwrap();

    assert_eq!(
        named_edges(&lattice),
        BTreeSet::from([
            edge("edge_xx", "single_x"),
            edge("edge_xy", "single_x"),
            edge("edge_xy", "single_y"),
            edge("path_xxx", "edge_xx"),
            edge("path_xxy", "edge_xx"),
            edge("path_xxy", "edge_xy"),
            edge("triangle_x", "path_xxx"),
        ])
    );
    assert_eq!(lattice.layers().max_layer(), Some(3));
    assert_eq!(lattice.leaves(), vec![idx(0), idx(1)]);
    assert_eq!(lattice.roots(), vec![idx(5), idx(6)]);
    lattice.verify_structure().unwrap();
    lattice.verify_containment().unwrap();
}

#[rstest]
#[case(false)]
#[case(true)]
fn mixed_counts_match_brute_force(#[case] parallel: bool) {
    init_test_logger();
    let config = Config::builder().parallel(parallel).build();
    let patterns = fixtures::mixed_patterns();
    let database = fixtures::mixed_database();

    let (expected, brute) = brute_force_occurrences(&patterns, &database, &config).unwrap();
    assert_eq!(brute.evaluations, 42);

    let mut lattice = Lattice::build(patterns, &config).unwrap();
    let summary = lattice.count_occurrences(&database, &config).unwrap();

    let counted: Vec<BTreeSet<usize>> = lattice.occurrence_sets().into_iter().cloned().collect();
    assert_eq!(counted, expected);
    assert_eq!(summary.evaluations, 24);
    assert_eq!(summary.pruned, 18);
    assert_eq!(lattice.occurrence_counts(), vec![4, 4, 2, 2, 2, 1, 1]);
    lattice.verify_structure().unwrap();
}

#[test]
fn recounting_replaces_previous_results() {
    let config = Config::default();
    let mut lattice = Lattice::build(fixtures::chain_patterns(), &config).unwrap();

    lattice.count_occurrences(&CHAIN_DATABASE, &config).unwrap();
    lattice.count_occurrences(&[fixtures::edge_xy()], &config).unwrap();

    assert_eq!(lattice.occurrence_counts(), vec![1, 0, 0]);
}

#[test]
fn duplicate_patterns_are_rejected() {
    init_test_logger();
    let patterns = vec![fixtures::edge_xx(), fixtures::single_x(), fixtures::edge_xx()];
    let err = Lattice::build(patterns, &Config::default()).unwrap_err();
    assert!(matches!(err, LatticeError::InvalidOrder { .. }));
}

#[test]
fn duplicates_pass_without_strict_order() {
    let config = Config::builder().strict_order(false).build();
    let patterns = vec![fixtures::edge_xx(), fixtures::edge_xx()];
    let lattice = Lattice::build(patterns, &config).unwrap();
    assert_eq!(lattice.stats().edges, 1);
}

#[test]
fn malformed_pattern_is_reported_before_any_check() {
    let broken = parse_graphs(r#"[{"labels": ["x"], "edges": [[0, 3]]}]"#).unwrap();
    let mut patterns = fixtures::chain_patterns();
    patterns.extend(broken);

    let err = Lattice::build(patterns, &Config::default()).unwrap_err();
    assert!(matches!(err, LatticeError::MalformedPattern { index: 3, .. }));
}

#[test]
fn malformed_database_graph_is_reported() {
    let mut lattice = Lattice::build(fixtures::chain_patterns(), &Config::default()).unwrap();
    let mut database = CHAIN_DATABASE.clone();
    database.extend(parse_graphs(r#"[{"labels": [], "edges": [[1, 0]]}]"#).unwrap());

    let err = lattice.count_occurrences(&database, &Config::default()).unwrap_err();
    assert!(matches!(err, LatticeError::MalformedGraph { index: 1, .. }));
    assert!(lattice.occurrence_sets().iter().all(|set| set.is_empty()));
}

#[test]
fn failing_pattern_check_aborts_the_build() {
    init_test_logger();
    let patterns = vec![Fragile::new(&[1]), Fragile::failing_from(&[1, 2], 1)];

    let err = Lattice::build(patterns, &Config::default()).unwrap_err();
    assert!(matches!(
        &err,
        LatticeError::Predicate { container, contained, source }
            if *container == idx(1) && *contained == idx(0) && source.size == 1
    ));
}

#[rstest]
#[case(false)]
#[case(true)]
fn failing_database_check_leaves_no_partial_counts(#[case] parallel: bool) {
    init_test_logger();
    let config = Config::builder().parallel(parallel).build();
    let patterns = vec![Fragile::new(&[1]), Fragile::new(&[1, 2])];
    let mut lattice = Lattice::build(patterns, &config).unwrap();

    lattice.count_occurrences(&[Fragile::new(&[1, 2, 3])], &config).unwrap();
    assert_eq!(lattice.occurrence_counts(), vec![1, 1]);

    // Layer 0 succeeds, the check of {1, 2} on layer 1 fails.
    let database = [Fragile::failing_from(&[1, 2, 3], 2)];
    let err = lattice.count_occurrences(&database, &config).unwrap_err();
    assert!(matches!(
        &err,
        LatticeError::DatabasePredicate { graph: 0, pattern, source }
            if *pattern == idx(1) && source.size == 2
    ));
    assert_eq!(lattice.occurrence_counts(), vec![0, 0]);
    assert!(lattice.occurrence_sets().iter().all(|set| set.is_empty()));
}

#[test]
fn failing_database_check_aborts_brute_force() {
    let patterns = [Fragile::new(&[1]), Fragile::new(&[1, 2])];
    let database = [Fragile::new(&[1]), Fragile::failing_from(&[1, 2, 3], 2)];

    let err = brute_force_occurrences(&patterns, &database, &Config::default()).unwrap_err();
    assert!(matches!(
        &err,
        LatticeError::DatabasePredicate { graph: 1, pattern, .. } if *pattern == idx(1)
    ));
}

#[test]
fn empty_inputs() {
    let config = Config::default();
    let mut lattice = Lattice::<LabeledGraph>::build(Vec::new(), &config).unwrap();
    assert!(lattice.is_empty());
    assert!(lattice.layers().is_empty());

    let summary = lattice.count_occurrences(&CHAIN_DATABASE, &config).unwrap();
    assert_eq!(summary.evaluations, 0);

    let mut lattice = Lattice::build(fixtures::chain_patterns(), &config).unwrap();
    let summary = lattice.count_occurrences(&[], &config).unwrap();
    assert_eq!(summary.evaluations, 0);
    assert_eq!(lattice.occurrence_counts(), vec![0, 0, 0]);
}

#[test]
fn export_and_description() {
    let lattice = Lattice::build(fixtures::chain_patterns(), &Config::default()).unwrap();

    let export = lattice.export();
    assert_eq!(export.nodes.len(), 3);
    assert_eq!(export.nodes[2].label, "triangle_x");
    assert_eq!(export.nodes[2].layer, 2);
    assert_eq!(export.edges.len(), 2);
    assert!(export.edges.iter().all(|e| e.label == "subgraph"));

    let json = serde_json::to_value(&export).unwrap();
    assert_eq!(json["edges"][0]["parent"], 1);
    assert_eq!(json["edges"][0]["child"], 0);

    assert_eq!(
        lattice.describe(false),
        "Layer: 0; Nodes: single_x\nLayer: 1; Nodes: edge_xx\nLayer: 2; Nodes: triangle_x"
    );
    let verbose = lattice.describe(true);
    assert!(verbose.contains("Node: edge_xx; Children: single_x"));
    assert!(verbose.contains("Layer: 0; Reachable: edge_xx:1, triangle_x:2"));
}

#[test]
fn unnamed_patterns_are_labeled_by_position() {
    let mut graph = LabeledGraph::new();
    graph.add_node("x");
    let lattice = Lattice::build(vec![fixtures::edge_xx(), graph], &Config::default()).unwrap();
    assert_eq!(lattice.label(idx(1)), "1");
    assert_eq!(lattice.describe(false), "Layer: 0; Nodes: 1\nLayer: 1; Nodes: edge_xx");
}
