use quickcheck::{Arbitrary, Gen, quickcheck};
use sublat_common::{Contains, CountEmbeddings, GraphMeta};
use sublat_graph::LabeledGraph;

const LABELS: [&str; 3] = ["x", "y", "z"];

/// A random host graph plus a subgraph cut out of it by dropping nodes and
/// edges.
#[derive(Clone, Debug)]
struct HostAndPart {
    host: LabeledGraph,
    part: LabeledGraph,
}

impl Arbitrary for HostAndPart {
    fn arbitrary(g: &mut Gen) -> Self {
        let nodes = u32::arbitrary(g) % 5 + 1;
        let labels: Vec<&str> = (0..nodes)
            .map(|_| LABELS[usize::arbitrary(g) % LABELS.len()])
            .collect();
        let mut edges = Vec::new();
        for source in 0..nodes {
            for target in 0..nodes {
                if u8::arbitrary(g) % 4 == 0 {
                    edges.push((source, target));
                }
            }
        }

        // Keep a random subset of nodes, renumbered in order.
        let kept: Vec<Option<u32>> = {
            let mut next = 0;
            (0..nodes)
                .map(|_| {
                    bool::arbitrary(g).then(|| {
                        next += 1;
                        next - 1
                    })
                })
                .collect()
        };
        let part_labels: Vec<&str> = labels
            .iter()
            .zip(&kept)
            .filter_map(|(label, keep)| keep.map(|_| *label))
            .collect();
        let part_edges: Vec<(u32, u32)> = edges
            .iter()
            .filter_map(|&(s, t)| Some((kept[s as usize]?, kept[t as usize]?)))
            .filter(|_| bool::arbitrary(g))
            .collect();

        let host = LabeledGraph::from_parts(None, labels, edges).unwrap();
        let part = LabeledGraph::from_parts(None, part_labels, part_edges).unwrap();
        HostAndPart { host, part }
    }
}

quickcheck! {
    fn prop_graph_contains_itself(case: HostAndPart) -> bool {
        case.host.contains(&case.host).unwrap()
    }

    fn prop_graph_contains_its_parts(case: HostAndPart) -> bool {
        case.host.contains(&case.part).unwrap()
    }

    fn prop_containment_agrees_with_embedding_count(case: HostAndPart) -> bool {
        let forward = case.host.count_embeddings(&case.part).unwrap();
        let backward = case.part.count_embeddings(&case.host).unwrap();
        forward >= 1
            && (backward > 0) == case.part.contains(&case.host).unwrap()
    }

    fn prop_parts_are_never_larger(case: HostAndPart) -> bool {
        case.part.node_count() <= case.host.node_count()
            && case.part.edge_count() <= case.host.edge_count()
    }
}
