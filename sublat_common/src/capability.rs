//! Narrow interfaces implemented by concrete graph representations.

/// Subgraph containment between two values of the same graph type.
///
/// `a.contains(&b)` must be true iff `b` is isomorphic to a subgraph of `a`.
/// Over a set of pairwise non-isomorphic patterns this is expected to be a
/// strict partial order; the lattice builder relies on it.
pub trait Contains {
    /// Failure raised by the predicate itself (for example malformed data).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns true if `other` occurs as a subgraph of `self`.
    fn contains(&self, other: &Self) -> Result<bool, Self::Error>;

    /// Checks that the value can take part in containment checks at all.
    ///
    /// Called once per pattern before lattice construction and once per
    /// database graph before counting.
    fn validate(&self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Counts distinct embeddings rather than answering yes/no.
pub trait CountEmbeddings: Contains {
    /// Number of distinct embeddings of `pattern` into `self`.
    fn count_embeddings(&self, pattern: &Self) -> Result<usize, Self::Error>;
}

/// Descriptive data used when reporting on a graph.
pub trait GraphMeta {
    /// Optional human readable name.
    fn name(&self) -> Option<&str>;

    /// Number of nodes.
    fn node_count(&self) -> usize;

    /// Number of edges.
    fn edge_count(&self) -> usize;

    /// Node count plus edge count.
    fn size(&self) -> usize {
        self.node_count() + self.edge_count()
    }
}

impl<T: Contains> Contains for Box<T> {
    type Error = T::Error;

    fn contains(&self, other: &Self) -> Result<bool, Self::Error> {
        (**self).contains(&**other)
    }

    fn validate(&self) -> Result<(), Self::Error> {
        (**self).validate()
    }
}

impl<T: Contains> Contains for &T {
    type Error = T::Error;

    fn contains(&self, other: &Self) -> Result<bool, Self::Error> {
        (**self).contains(*other)
    }

    fn validate(&self) -> Result<(), Self::Error> {
        (**self).validate()
    }
}

impl<T: GraphMeta> GraphMeta for &T {
    fn name(&self) -> Option<&str> {
        (**self).name()
    }

    fn node_count(&self) -> usize {
        (**self).node_count()
    }

    fn edge_count(&self) -> usize {
        (**self).edge_count()
    }
}
